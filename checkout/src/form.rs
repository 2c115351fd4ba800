use crate::address::Address;
use crate::field::FieldId;
use crate::flow::{OrderSummary, SubmissionCheck};
use crate::payment::{PaymentMethod, PaymentSelection};
use crate::validator::{FieldState, FieldValidator};

/// Everything the checkout page knows about the order being placed: field
/// values with their markers, the payment choice and the summary shown in the
/// sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    validator: FieldValidator,
    fields: Vec<FieldState>,
    payment: PaymentSelection,
    order: OrderSummary,
}

impl CheckoutForm {
    pub fn new(validator: FieldValidator, order: OrderSummary) -> Self {
        Self {
            validator,
            fields: FieldId::ALL.into_iter().map(FieldState::new).collect(),
            payment: PaymentSelection::default(),
            order,
        }
    }

    pub fn field(&self, id: FieldId) -> &FieldState {
        &self.fields[id.index()]
    }

    pub fn order(&self) -> &OrderSummary {
        &self.order
    }

    pub fn payment(&self) -> &PaymentSelection {
        &self.payment
    }

    /// Card inputs are required only while paying by card; the complement never is.
    pub fn is_required(&self, id: FieldId) -> bool {
        if id.is_optional() {
            return false;
        }
        if id.is_card_field() {
            return self.payment.is_active(PaymentMethod::CreditCard);
        }
        true
    }

    /// Masks `raw` into the field and returns what the input should display.
    pub fn input(&mut self, id: FieldId, raw: &str) -> String {
        let required = self.is_required(id);
        let validator = self.validator;
        self.fields[id.index()]
            .on_input(raw, &validator, required)
            .to_string()
    }

    pub fn blur(&mut self, id: FieldId) -> bool {
        let required = self.is_required(id);
        let validator = self.validator;
        self.fields[id.index()].on_blur(&validator, required)
    }

    pub fn fill_address(&mut self, address: &Address) {
        self.fields[FieldId::Street.index()].set_value(address.street.clone());
        self.fields[FieldId::City.index()].set_value(address.city.clone());
        self.fields[FieldId::State.index()].set_value(address.state.clone());
    }

    pub fn select_payment(&mut self, method: PaymentMethod) -> Option<PaymentMethod> {
        self.payment.select(method)
    }

    /// Validates every required field, marking each one, and reports the
    /// result for the submission flow. All fields are visited even after the
    /// first failure so every error shows at once. Without a payment method
    /// nothing is validated and no field gets a marker.
    pub fn check(&mut self) -> SubmissionCheck {
        let Some(method) = self.payment.active() else {
            return SubmissionCheck {
                method: None,
                invalid_fields: Vec::new(),
                order: self.order.clone(),
            };
        };

        let validator = self.validator;
        let mut invalid_fields = Vec::new();
        for id in FieldId::ALL {
            if !self.is_required(id) {
                continue;
            }
            if !self.fields[id.index()].validate(&validator, true) {
                invalid_fields.push(id);
            }
        }

        SubmissionCheck {
            method: Some(method),
            invalid_fields,
            order: self.order.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Effect, SubmissionEvent, SubmissionFlow, SubmissionState, SubmitBlocked};
    use crate::validator::{Marker, YearMonth};

    fn form() -> CheckoutForm {
        CheckoutForm::new(
            FieldValidator::at(YearMonth::new(2026, 10)),
            OrderSummary {
                plan_name: "Profissional".to_string(),
                total_label: "R$ 899,00".to_string(),
            },
        )
    }

    fn fill_customer(form: &mut CheckoutForm) {
        form.input(FieldId::Name, "Marta Vieira");
        form.input(FieldId::Email, "marta@clube.com.br");
        form.input(FieldId::Cpf, "52998224725");
        form.input(FieldId::Phone, "11934567890");
        form.input(FieldId::Cep, "01310100");
        form.fill_address(&Address {
            street: "Avenida Paulista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        });
        form.input(FieldId::Number, "1000");
    }

    #[test]
    fn input_applies_masks() {
        let mut form = form();
        assert_eq!(form.input(FieldId::Cpf, "52998224725"), "529.982.247-25");
        assert_eq!(form.input(FieldId::Cep, "01310100"), "01310-100");
        assert_eq!(form.field(FieldId::Cep).value(), "01310-100");
    }

    #[test]
    fn card_fields_required_only_for_credit_card() {
        let mut form = form();
        assert!(!form.is_required(FieldId::CardNumber));
        assert!(!form.is_required(FieldId::Complement));

        form.select_payment(PaymentMethod::CreditCard);
        assert!(form.is_required(FieldId::CardNumber));

        form.select_payment(PaymentMethod::Pix);
        assert!(!form.is_required(FieldId::CardCvv));
    }

    #[test]
    fn check_visits_every_required_field() {
        let mut form = form();
        form.select_payment(PaymentMethod::Pix);
        form.input(FieldId::Cpf, "11111111111");
        form.input(FieldId::Email, "sem-arroba");
        let check = form.check();

        assert_eq!(check.method, Some(PaymentMethod::Pix));
        assert!(check.invalid_fields.contains(&FieldId::Cpf));
        assert!(check.invalid_fields.contains(&FieldId::Email));
        assert!(check.invalid_fields.contains(&FieldId::Name));
        assert!(!check.invalid_fields.contains(&FieldId::Complement));
        assert_eq!(form.field(FieldId::Cpf).marker(), Marker::Invalid);
    }

    #[test]
    fn no_payment_method_leaves_fields_unmarked() {
        let mut form = form();
        form.input(FieldId::Cpf, "11111111111");
        form.input(FieldId::Email, "sem-arroba");
        let check = form.check();

        assert_eq!(check.method, None);
        assert!(check.invalid_fields.is_empty());
        for id in FieldId::ALL {
            assert_eq!(form.field(id).marker(), Marker::Unmarked, "{id}");
            assert_eq!(form.field(id).error_message(), None);
        }
    }

    #[test]
    fn complete_pix_order_passes() {
        let mut form = form();
        fill_customer(&mut form);
        form.select_payment(PaymentMethod::Pix);

        let check = form.check();
        assert_eq!(check.invalid_fields, Vec::<FieldId>::new());
        assert_eq!(check.method, Some(PaymentMethod::Pix));
    }

    #[test]
    fn card_order_needs_card_fields() {
        let mut form = form();
        fill_customer(&mut form);
        form.select_payment(PaymentMethod::CreditCard);
        assert_eq!(
            form.check().invalid_fields,
            vec![
                FieldId::CardNumber,
                FieldId::CardName,
                FieldId::CardExpiry,
                FieldId::CardCvv
            ]
        );

        form.input(FieldId::CardNumber, "4532015112830366");
        form.input(FieldId::CardName, "MARTA VIEIRA");
        form.input(FieldId::CardExpiry, "1026");
        form.input(FieldId::CardCvv, "123");
        assert!(form.check().invalid_fields.is_empty());
    }

    #[test]
    fn form_drives_flow_to_success() {
        let mut form = form();
        fill_customer(&mut form);
        let mut flow = SubmissionFlow::default();

        // no method yet
        assert_eq!(flow.handle(SubmissionEvent::SubmitRequested), vec![Effect::ValidateAll]);
        let effects = flow.handle(SubmissionEvent::ValidationCompleted(form.check()));
        assert_eq!(effects, vec![Effect::Blocked(SubmitBlocked::NoPaymentMethod)]);

        form.select_payment(PaymentMethod::Boleto);
        flow.handle(SubmissionEvent::SubmitRequested);
        flow.handle(SubmissionEvent::ValidationCompleted(form.check()));
        assert_eq!(flow.state(), SubmissionState::Submitting);
        flow.handle(SubmissionEvent::ProcessingFinished);
        assert_eq!(flow.state(), SubmissionState::Success);
    }
}
