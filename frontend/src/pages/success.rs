use chrono::{Local, TimeZone};
use checkout::{ConfirmationHandoff, PaymentMethod};
use yew::prelude::*;

fn method_label(key: &str) -> String {
    key.parse::<PaymentMethod>()
        .map(|method| method.label().to_string())
        .unwrap_or_else(|_| key.to_string())
}

fn format_timestamp(timestamp_ms: i64) -> Option<String> {
    if timestamp_ms <= 0 {
        return None;
    }
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
}

#[function_component(Success)]
pub fn success() -> Html {
    let handoff = use_memo(
        |_| {
            let query = web_sys::window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            ConfirmationHandoff::parse(&query).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed confirmation query: {}", e);
                ConfirmationHandoff::default()
            })
        },
        (),
    );

    html! {
        <main class="success-page">
            <section class="success-card">
                <h1>{"Pagamento confirmado!"}</h1>
                <p>{"Obrigado por escolher a MovAccess. Em breve nossa equipe entrará em contato."}</p>
                <dl class="success-details">
                    <dt>{"Plano"}</dt>
                    <dd>{handoff.plan.clone()}</dd>
                    {
                        if handoff.total.is_empty() {
                            html! {}
                        } else {
                            html! {
                                <>
                                    <dt>{"Valor"}</dt>
                                    <dd>{handoff.total.clone()}</dd>
                                </>
                            }
                        }
                    }
                    <dt>{"Forma de pagamento"}</dt>
                    <dd>{method_label(&handoff.method)}</dd>
                    {
                        if let Some(when) = format_timestamp(handoff.timestamp_ms) {
                            html! {
                                <>
                                    <dt>{"Data"}</dt>
                                    <dd>{when}</dd>
                                </>
                            }
                        } else {
                            html! {}
                        }
                    }
                </dl>
                <a class="btn-primary" href="/">{"Voltar ao início"}</a>
            </section>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods_get_labels() {
        assert_eq!(method_label("pix"), "PIX");
        assert_eq!(method_label("cartao"), "Cartão de crédito");
        assert_eq!(method_label("indefinido"), "indefinido");
    }

    #[test]
    fn missing_timestamp_is_hidden() {
        assert_eq!(format_timestamp(0), None);
        assert!(format_timestamp(1_760_000_000_000).is_some());
    }
}
