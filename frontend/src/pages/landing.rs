use checkout::is_valid_email;
use checkout::news::{NewsFilter, NewsItem};
use checkout::plans::Plan;
use gloo_net::http::Request;
use serde::Deserialize;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::config;

const CATEGORIES: [(&str, &str); 4] = [
    ("eventos", "Eventos"),
    ("parcerias", "Parcerias"),
    ("tecnologia", "Tecnologia"),
    ("inclusao", "Inclusão"),
];

fn news_items() -> Vec<NewsItem> {
    let item = |title: &str, description: &str, category: &str, link: &str| NewsItem {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        link: link.to_string(),
    };
    vec![
        item(
            "MovAccess na Copa Paralímpica de Atletismo",
            "Cobertura digital completa dos atletas apoiados durante a etapa nacional.",
            "eventos",
            "/noticias/copa-paralimpica",
        ),
        item(
            "Nova parceria com federações estaduais",
            "Atletas filiados passam a contar com consultoria de imagem e relatórios mensais.",
            "parcerias",
            "/noticias/federacoes",
        ),
        item(
            "IA preditiva no acompanhamento de engajamento",
            "Modelos de análise de sentimento chegam aos planos Profissional e Premium.",
            "tecnologia",
            "/noticias/ia-preditiva",
        ),
        item(
            "Guia de acessibilidade para redes sociais",
            "Boas práticas de legendas, audiodescrição e contraste para perfis esportivos.",
            "inclusao",
            "/noticias/guia-acessibilidade",
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct SubscribeResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Properties, PartialEq)]
struct PlanModalProps {
    plan: Plan,
    on_close: Callback<MouseEvent>,
}

#[function_component(PlanModal)]
fn plan_modal(props: &PlanModalProps) -> Html {
    let details = props.plan.details();
    html! {
        <div class="modal-overlay" onclick={props.on_close.clone()}>
            <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <button class="modal-close" onclick={props.on_close.clone()}>{"×"}</button>
                <h3>{details.title}</h3>
                <p class="modal-price">{props.plan.price_label()}</p>
                <p>{details.description}</p>
                <ul class="modal-features">
                    { for details.features.iter().map(|feature| html! { <li>{*feature}</li> }) }
                </ul>
                <a class="btn-primary" href={props.plan.checkout_path()}>{"Contratar agora"}</a>
            </div>
        </div>
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let selected_plan = use_state(|| None::<Plan>);
    let filter = use_state(NewsFilter::default);
    let items = use_memo(|_| news_items(), ());

    let name = use_state(String::new);
    let email = use_state(String::new);
    let sending = use_state(|| false);
    let feedback = use_state(|| None::<(bool, String)>);

    let close_modal = {
        let selected_plan = selected_plan.clone();
        Callback::from(move |_: MouseEvent| selected_plan.set(None))
    };

    let on_search = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter.set(NewsFilter::new(input.value(), filter.category.clone()));
        })
    };

    let on_category = {
        let filter = filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            filter.set(NewsFilter::new(filter.term.clone(), select.value()));
        })
    };

    let pick_category = |category: &'static str| {
        let filter = filter.clone();
        Callback::from(move |_: MouseEvent| {
            filter.set(NewsFilter::new(filter.term.clone(), category));
        })
    };

    let on_subscribe = {
        let name = name.clone();
        let email = email.clone();
        let sending = sending.clone();
        let feedback = feedback.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *sending {
                return;
            }
            let name_value = name.trim().to_string();
            let email_value = email.trim().to_string();
            if name_value.is_empty() || !is_valid_email(&email_value) {
                feedback.set(Some((false, "Por favor, informe um nome e um e-mail válido.".to_string())));
                return;
            }

            sending.set(true);
            let name = name.clone();
            let email = email.clone();
            let sending = sending.clone();
            let feedback = feedback.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let body = format!(
                    "name={}&email={}",
                    urlencoding::encode(&name_value),
                    urlencoding::encode(&email_value)
                );
                let result = Request::post(&format!("{}/api/subscribe", config::get_backend_url()))
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(body)
                    .send()
                    .await;

                match result {
                    Ok(response) => match response.json::<SubscribeResponse>().await {
                        Ok(SubscribeResponse { success: true, .. }) => {
                            log::info!("Newsletter signup accepted");
                            name.set(String::new());
                            email.set(String::new());
                            feedback.set(Some((true, "Inscrição realizada com sucesso!".to_string())));
                        }
                        Ok(SubscribeResponse { error, .. }) => {
                            feedback.set(Some((
                                false,
                                error.unwrap_or_else(|| "Não foi possível concluir a inscrição.".to_string()),
                            )));
                        }
                        Err(e) => {
                            log::error!("Unreadable newsletter response: {}", e);
                            feedback.set(Some((false, "Não foi possível concluir a inscrição.".to_string())));
                        }
                    },
                    Err(e) => {
                        log::error!("Newsletter request failed: {}", e);
                        feedback.set(Some((false, "Erro de conexão. Tente novamente.".to_string())));
                    }
                }
                sending.set(false);
            });
        })
    };

    let visible = filter.apply(&items);

    html! {
        <main class="landing">
            <section id="inicio" class="hero">
                <h1>{"Marketing esportivo com inteligência e inclusão"}</h1>
                <p>{"Gestão de imagem, conteúdo e dados para atletas, clubes e patrocinadores."}</p>
                <a class="btn-primary" href="#planos">{"Conheça os planos"}</a>
            </section>

            <section id="planos" class="plans">
                <h2>{"Planos"}</h2>
                <div class="plans-grid">
                    { for Plan::ALL.into_iter().map(|plan| {
                        let open = {
                            let selected_plan = selected_plan.clone();
                            Callback::from(move |_: MouseEvent| selected_plan.set(Some(plan)))
                        };
                        html! {
                            <div class="plan-card" data-plan={plan.key()}>
                                <h3>{plan.details().title}</h3>
                                <p class="plan-price">{plan.price_label()}</p>
                                <p>{plan.details().description}</p>
                                <button class="btn-secondary" onclick={open}>{"Ver detalhes"}</button>
                                <a class="btn-primary" href={plan.checkout_path()}>{"Contratar"}</a>
                            </div>
                        }
                    }) }
                </div>
            </section>

            <section id="comunicacoes" class="comms">
                <h2>{"Comunicações"}</h2>
                <div class="comms-controls">
                    <input
                        id="comms-search"
                        type="search"
                        placeholder="Buscar comunicações..."
                        value={filter.term.clone()}
                        oninput={on_search}
                    />
                    <select id="comms-filter" onchange={on_category}>
                        <option value="" selected={filter.selects("")}>{"Todas as categorias"}</option>
                        { for CATEGORIES.iter().map(|(key, label)| html! {
                            <option value={*key} selected={filter.selects(key)}>{*label}</option>
                        }) }
                    </select>
                </div>
                <div class="comms-categories">
                    <button class={classes!("service-btn", filter.selects("").then(|| "active"))} data-cat="" onclick={pick_category("")}>{"Todas"}</button>
                    { for CATEGORIES.iter().map(|(key, label)| html! {
                        <button class={classes!("service-btn", filter.selects(key).then(|| "active"))} data-cat={*key} onclick={pick_category(*key)}>{*label}</button>
                    }) }
                </div>
                {
                    if visible.is_empty() {
                        html! { <p class="comms-empty">{"Nenhuma comunicação encontrada."}</p> }
                    } else {
                        html! {
                            <div class="comms-grid">
                                { for visible.into_iter().map(|item| html! {
                                    <article class="comm-card" data-category={item.category.clone()}>
                                        <h3>{item.title.clone()}</h3>
                                        <p>{item.description.clone()}</p>
                                        <a class="service-btn" href={item.link.clone()}>{"Ler mais"}</a>
                                    </article>
                                }) }
                            </div>
                        }
                    }
                }
            </section>

            <section id="contato" class="newsletter">
                <h2>{"Receba nossas atualizações"}</h2>
                <form class="newsletter-form" onsubmit={on_subscribe}>
                    <input
                        type="text"
                        name="name"
                        placeholder="Seu nome"
                        value={(*name).clone()}
                        oninput={
                            let name = name.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                name.set(input.value());
                            })
                        }
                    />
                    <input
                        type="email"
                        name="email"
                        placeholder="Seu e-mail"
                        value={(*email).clone()}
                        oninput={
                            let email = email.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                email.set(input.value());
                            })
                        }
                    />
                    <button type="submit" class="btn-primary" disabled={*sending}>
                        { if *sending { "Enviando..." } else { "Inscrever-se" } }
                    </button>
                </form>
                {
                    if let Some((ok, message)) = (*feedback).clone() {
                        html! {
                            <p class={classes!("newsletter-feedback", if ok { "success" } else { "error" })}>
                                {message}
                            </p>
                        }
                    } else {
                        html! {}
                    }
                }
            </section>

            {
                if let Some(plan) = *selected_plan {
                    html! { <PlanModal plan={plan} on_close={close_modal} /> }
                } else {
                    html! {}
                }
            }
        </main>
    }
}
