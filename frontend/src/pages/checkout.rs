use std::collections::VecDeque;

use checkout::address::{self, Address};
use checkout::plans::{format_brl, Plan};
use checkout::{
    CheckoutForm, Effect, FieldId, FieldValidator, FlowTiming, OrderSummary, PaymentCodes,
    PaymentMethod, SubmissionEvent, SubmissionFlow, SubmissionState, SubmitBlocked, TimerEvent,
};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use web_sys::{HtmlInputElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};
use yew::prelude::*;

const COPY_FEEDBACK_MS: u32 = 2_000;
const BOLETO_DOWNLOAD_NOTICE: &str =
    "Funcionalidade de download de boleto será implementada com integração bancária real.";
const BACK_FALLBACK_URL: &str = "/#planos";
const CONFIRMATION_ID: &str = "success-message";

/// Everything the page derives once from the URL and the clock.
#[derive(Debug, Clone)]
pub struct CheckoutContext {
    pub plan: Plan,
    pub order: OrderSummary,
    pub amount_cents: u64,
    pub validator: FieldValidator,
    pub timing: FlowTiming,
}

impl CheckoutContext {
    fn from_location() -> Option<Self> {
        let query = web_sys::window()?.location().search().ok()?;
        let plan = match Plan::from_query(&query) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("Checkout opened without a known plan: {}", e);
                return None;
            }
        };
        let amount_cents = plan.details().monthly_cents;

        Some(Self {
            plan,
            order: OrderSummary {
                plan_name: plan.to_string(),
                total_label: format_brl(amount_cents),
            },
            amount_cents,
            validator: FieldValidator::now(),
            timing: FlowTiming::default(),
        })
    }
}

pub enum Msg {
    Input(FieldId, HtmlInputElement),
    Blur(FieldId),
    AddressLoaded(Option<Address>),
    SelectPayment(PaymentMethod),
    CopyPix,
    CopyReset,
    DownloadBoleto,
    Submit,
    Timer(TimerEvent),
    Back,
}

pub struct CheckoutPage {
    context: Option<CheckoutContext>,
    form: CheckoutForm,
    flow: SubmissionFlow,
    codes: PaymentCodes,
    loading: bool,
    submit_disabled: bool,
    confirmed: bool,
    scroll_to_confirmation: bool,
    copied: bool,
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn element(dom_id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(dom_id)
}

fn scroll_to(dom_id: &str) {
    if let Some(element) = element(dom_id) {
        element.scroll_into_view();
    }
}

fn scroll_to_center(dom_id: &str) {
    let Some(element) = element(dom_id) else {
        return;
    };
    let mut options = ScrollIntoViewOptions::new();
    options
        .behavior(ScrollBehavior::Smooth)
        .block(ScrollLogicalPosition::Center);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

/// History back only returns to a page that actually led here; otherwise
/// the visitor lands on the plans section.
fn came_from_elsewhere(history_len: u32, referrer: &str, href: &str) -> bool {
    history_len > 1 && !referrer.is_empty() && referrer != href
}

fn go_back() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let history = window.history().ok();
    let history_len = history.as_ref().and_then(|h| h.length().ok()).unwrap_or(0);
    let referrer = window.document().map(|d| d.referrer()).unwrap_or_default();
    let href = window.location().href().unwrap_or_default();

    if let Some(history) = history.filter(|_| came_from_elsewhere(history_len, &referrer, &href)) {
        if history.back().is_ok() {
            return;
        }
    }
    let _ = window.location().set_href(BACK_FALLBACK_URL);
}

impl CheckoutPage {
    /// Performs the effects returned by the submission flow, feeding any
    /// follow-up events straight back into it.
    fn apply(&mut self, ctx: &Context<Self>, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut first_invalid = None;

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ValidateAll => {
                    let check = self.form.check();
                    first_invalid = check.invalid_fields.first().copied();
                    queue.extend(self.flow.handle(SubmissionEvent::ValidationCompleted(check)));
                }
                Effect::Blocked(reason) => {
                    alert(&reason.to_string());
                    if reason == SubmitBlocked::InvalidFields {
                        if let Some(id) = first_invalid {
                            scroll_to(id.dom_id());
                        }
                    }
                }
                Effect::DisableSubmit => self.submit_disabled = true,
                Effect::EnableSubmit => self.submit_disabled = false,
                Effect::ShowLoading => self.loading = true,
                Effect::HideLoading => self.loading = false,
                Effect::RevealConfirmation => {
                    self.confirmed = true;
                    self.scroll_to_confirmation = true;
                }
                Effect::Schedule { event, after } => {
                    let link = ctx.link().clone();
                    let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
                    Timeout::new(millis, move || link.send_message(Msg::Timer(event))).forget();
                }
                Effect::Navigate(url) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(&url);
                    }
                }
            }
        }
    }

    fn lookup_address(&self, ctx: &Context<Self>) {
        let Some(url) = address::lookup_url(self.form.field(FieldId::Cep).value()) else {
            return;
        };
        ctx.link().send_future(async move {
            let address = match Request::get(&url).send().await {
                Ok(response) => match response.text().await {
                    Ok(body) => address::parse_lookup(&body),
                    Err(_) => None,
                },
                Err(e) => {
                    log::debug!("CEP lookup failed: {}", e);
                    None
                }
            };
            Msg::AddressLoaded(address)
        });
    }

    fn field_view(&self, ctx: &Context<Self>, id: FieldId, input_type: &'static str) -> Html {
        let state = self.form.field(id);
        let oninput = ctx.link().callback(move |e: InputEvent| {
            Msg::Input(id, e.target_unchecked_into::<HtmlInputElement>())
        });
        let onblur = ctx.link().callback(move |_: FocusEvent| Msg::Blur(id));

        html! {
            <div class="form-group">
                <label for={id.dom_id()}>
                    {id.label()}
                    { if self.form.is_required(id) { html! { <span class="required">{" *"}</span> } } else { html! {} } }
                </label>
                <input
                    id={id.dom_id()}
                    name={id.dom_id()}
                    type={input_type}
                    class={classes!(state.marker().class())}
                    value={state.value().to_string()}
                    {oninput}
                    {onblur}
                />
                {
                    if let Some(message) = state.error_message() {
                        html! { <span class="error-message">{message.to_string()}</span> }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }

    fn payment_panel(&self, ctx: &Context<Self>, method: PaymentMethod) -> Html {
        let active = self.form.payment().is_active(method);
        let body = match method {
            PaymentMethod::Pix => {
                let code = self.codes.cached(method).unwrap_or("Gerando código PIX...");
                html! {
                    <>
                        <p>{"Copie o código abaixo e pague no aplicativo do seu banco."}</p>
                        <code id="pix-code" data-code={code.to_string()}>{code.to_string()}</code>
                        <button type="button" class="pix-copy-btn" onclick={ctx.link().callback(|_| Msg::CopyPix)}>
                            { if self.copied { "Copiado!" } else { "Copiar código" } }
                        </button>
                    </>
                }
            }
            PaymentMethod::Boleto => {
                let code = self.codes.cached(method).unwrap_or("Gerando código de barras...");
                html! {
                    <>
                        <p>{"O boleto vence em 3 dias."}</p>
                        <code id="boleto-code" data-code={code.to_string()}>{code.to_string()}</code>
                        <button type="button" class="boleto-download-btn" onclick={ctx.link().callback(|_| Msg::DownloadBoleto)}>
                            {"Baixar boleto"}
                        </button>
                    </>
                }
            }
            PaymentMethod::CreditCard => html! {
                <>
                    { self.field_view(ctx, FieldId::CardNumber, "text") }
                    { self.field_view(ctx, FieldId::CardName, "text") }
                    { self.field_view(ctx, FieldId::CardExpiry, "text") }
                    { self.field_view(ctx, FieldId::CardCvv, "text") }
                </>
            },
        };

        html! {
            <div id={method.panel_id()} class={classes!("payment-details", active.then(|| "active"))}>
                { body }
            </div>
        }
    }
}

impl Component for CheckoutPage {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let context = CheckoutContext::from_location();
        let (validator, order, amount_cents, timing) = match &context {
            Some(c) => (c.validator, c.order.clone(), c.amount_cents, c.timing),
            None => (
                FieldValidator::now(),
                OrderSummary {
                    plan_name: "Plano".to_string(),
                    total_label: String::new(),
                },
                0,
                FlowTiming::default(),
            ),
        };

        Self {
            context,
            form: CheckoutForm::new(validator, order),
            flow: SubmissionFlow::new(timing),
            codes: PaymentCodes::new(amount_cents, chrono::Local::now().date_naive()),
            loading: false,
            submit_disabled: false,
            confirmed: false,
            scroll_to_confirmation: false,
            copied: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Input(id, input) => {
                let raw = input.value();
                let masked = self.form.input(id, &raw);
                if masked != raw {
                    input.set_value(&masked);
                }
                true
            }
            Msg::Blur(id) => {
                let valid = self.form.blur(id);
                if id == FieldId::Cep && valid {
                    self.lookup_address(ctx);
                }
                true
            }
            Msg::AddressLoaded(Some(address)) => {
                self.form.fill_address(&address);
                true
            }
            Msg::AddressLoaded(None) => false,
            Msg::SelectPayment(method) => {
                if let Some(previous) = self.form.select_payment(method) {
                    log::info!("Payment method changed from {} to {}", previous, method);
                }
                self.codes.code_for(method);
                true
            }
            Msg::CopyPix => {
                let Some(code) = self.codes.cached(PaymentMethod::Pix).map(str::to_string) else {
                    return false;
                };
                let Some(window) = web_sys::window() else {
                    return false;
                };
                let promise = window.navigator().clipboard().write_text(&code);
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                        log::warn!("Clipboard write rejected: {:?}", e);
                    }
                });
                self.copied = true;
                let link = ctx.link().clone();
                Timeout::new(COPY_FEEDBACK_MS, move || link.send_message(Msg::CopyReset)).forget();
                true
            }
            Msg::CopyReset => {
                self.copied = false;
                true
            }
            Msg::DownloadBoleto => {
                alert(BOLETO_DOWNLOAD_NOTICE);
                false
            }
            Msg::Submit => {
                let effects = self.flow.handle(SubmissionEvent::SubmitRequested);
                self.apply(ctx, effects);
                true
            }
            Msg::Timer(event) => {
                let event = match event {
                    TimerEvent::ProcessingFinished => SubmissionEvent::ProcessingFinished,
                    TimerEvent::RedirectDue => SubmissionEvent::RedirectDue {
                        timestamp_ms: chrono::Utc::now().timestamp_millis(),
                    },
                };
                let effects = self.flow.handle(event);
                self.apply(ctx, effects);
                true
            }
            Msg::Back => {
                go_back();
                false
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if std::mem::take(&mut self.scroll_to_confirmation) {
            scroll_to_center(CONFIRMATION_ID);
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(context) = &self.context else {
            return html! {
                <section class="checkout-missing">
                    <h1>{"Plano não encontrado"}</h1>
                    <p>{"Escolha um dos nossos planos para continuar."}</p>
                    <a class="btn-primary" href="/#planos">{"Ver planos"}</a>
                </section>
            };
        };

        if self.confirmed {
            return html! {
                <section id={CONFIRMATION_ID} class="checkout-success">
                    <h2>{"Pagamento processado com sucesso!"}</h2>
                    <p>{format!("Plano {} contratado. Você será redirecionado em instantes.", context.order.plan_name)}</p>
                </section>
            };
        }

        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let busy = self.flow.state() == SubmissionState::Submitting;

        html! {
            <main class="checkout">
                <button type="button" class="btn-back" onclick={ctx.link().callback(|_| Msg::Back)}>
                    {"← Voltar"}
                </button>
                <form id="checkout-form" class="checkout-form" {onsubmit}>
                    <section class="form-section">
                        <h2>{"Dados pessoais"}</h2>
                        { self.field_view(ctx, FieldId::Name, "text") }
                        { self.field_view(ctx, FieldId::Email, "text") }
                        { self.field_view(ctx, FieldId::Cpf, "text") }
                        { self.field_view(ctx, FieldId::Phone, "tel") }
                    </section>

                    <section class="form-section">
                        <h2>{"Endereço"}</h2>
                        { self.field_view(ctx, FieldId::Cep, "text") }
                        { self.field_view(ctx, FieldId::Street, "text") }
                        { self.field_view(ctx, FieldId::Number, "text") }
                        { self.field_view(ctx, FieldId::Complement, "text") }
                        { self.field_view(ctx, FieldId::City, "text") }
                        { self.field_view(ctx, FieldId::State, "text") }
                    </section>

                    <section class="form-section">
                        <h2>{"Forma de pagamento"}</h2>
                        <div class="payment-methods">
                            { for PaymentMethod::ALL.into_iter().map(|method| html! {
                                <button
                                    type="button"
                                    class={classes!("payment-method", self.form.payment().is_active(method).then(|| "active"))}
                                    data-method={method.key()}
                                    onclick={ctx.link().callback(move |_| Msg::SelectPayment(method))}
                                >
                                    {method.label()}
                                </button>
                            }) }
                        </div>
                        { for PaymentMethod::ALL.into_iter().map(|method| self.payment_panel(ctx, method)) }
                    </section>

                    <button type="submit" class="btn-submit" disabled={self.submit_disabled}>
                        {
                            if self.loading || busy {
                                html! { <span class="loading">{"Processando pagamento..."}</span> }
                            } else {
                                html! { {"Finalizar pagamento"} }
                            }
                        }
                    </button>
                </form>

                <aside class="order-summary">
                    <h3>{"Resumo do pedido"}</h3>
                    <p class="summary-plan">{context.order.plan_name.clone()}</p>
                    <p class="summary-description">{context.plan.details().description}</p>
                    <div class="summary-total">
                        <span>{"Total"}</span>
                        <span>{context.order.total_label.clone()}</span>
                    </div>
                </aside>
            </main>
        }
    }
}
