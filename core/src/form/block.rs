use super::FieldKey;
use super::FormDescription;
use super::FormId;
use super::FormMode;
use super::ProductField;
use super::SubmissionPayload;
use super::SubmitError;
use super::parse_quantity;

/// State of a form's submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitControl {
    /// Never submitted.
    Ready,
    /// Disabled: a submission is in flight or has been accepted.
    Submitted,
    /// Re-enabled after a failed submission.
    Retry,
}

impl SubmitControl {
    pub fn label(self, mode: FormMode) -> &'static str {
        match self {
            SubmitControl::Ready => mode.submit_label(),
            SubmitControl::Submitted => mode.submitted_label(),
            SubmitControl::Retry => "Try Again",
        }
    }

    pub fn is_enabled(self) -> bool {
        !matches!(self, SubmitControl::Submitted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ProductValue {
    Locked(String),
    Selected(usize),
}

/// One live form in the transcript.
///
/// A block owns its own field values, so edits and submissions of one block
/// never reach any other block rendered from the same (or any) description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBlock {
    id: FormId,
    description: FormDescription,
    full_name: String,
    email: String,
    phone: String,
    address: String,
    product: ProductValue,
    quantity: String,
    control: SubmitControl,
}

impl FormBlock {
    pub fn new(id: FormId, description: FormDescription) -> Self {
        let text = |key: FieldKey| {
            description
                .text_fields
                .iter()
                .find(|f| f.key == key)
                .map(|f| f.value.clone())
                .unwrap_or_default()
        };
        let product = match &description.product {
            ProductField::Locked(value) => ProductValue::Locked(value.clone()),
            ProductField::Selector(selector) => ProductValue::Selected(selector.selected),
        };
        Self {
            id,
            full_name: text(FieldKey::FullName),
            email: text(FieldKey::Email),
            phone: text(FieldKey::Phone),
            address: text(FieldKey::Address),
            product,
            quantity: description.quantity.to_string(),
            control: SubmitControl::Ready,
            description,
        }
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn description(&self) -> &FormDescription {
        &self.description
    }

    pub fn mode(&self) -> FormMode {
        self.description.mode
    }

    pub fn control(&self) -> SubmitControl {
        self.control
    }

    pub fn submit_label(&self) -> &'static str {
        self.control.label(self.description.mode)
    }

    pub fn is_product_locked(&self) -> bool {
        matches!(self.product, ProductValue::Locked(_))
    }

    /// Current raw value of a field as the user sees it.
    pub fn value(&self, key: FieldKey) -> String {
        match key {
            FieldKey::FullName => self.full_name.clone(),
            FieldKey::Email => self.email.clone(),
            FieldKey::Phone => self.phone.clone(),
            FieldKey::Address => self.address.clone(),
            FieldKey::ProductInterest => self.product_value(),
            FieldKey::Quantity => self.quantity.clone(),
        }
    }

    /// Overwrite a free-text field (including the raw quantity text).
    /// Returns `false` for the product field, which is not free text.
    pub fn set_text(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        let slot = match key {
            FieldKey::FullName => &mut self.full_name,
            FieldKey::Email => &mut self.email,
            FieldKey::Phone => &mut self.phone,
            FieldKey::Address => &mut self.address,
            FieldKey::Quantity => &mut self.quantity,
            FieldKey::ProductInterest => return false,
        };
        *slot = value.into();
        true
    }

    /// Index of the selected option, `None` when the product is locked.
    pub fn selected_product_index(&self) -> Option<usize> {
        match self.product {
            ProductValue::Locked(_) => None,
            ProductValue::Selected(index) => Some(index),
        }
    }

    /// Select a product option. Locked fields, out-of-range indexes and the
    /// disabled placeholder are refused.
    pub fn select_product(&mut self, index: usize) -> bool {
        let ProductField::Selector(selector) = &self.description.product else {
            return false;
        };
        match selector.options.get(index) {
            Some(option) if !option.is_disabled() => {
                self.product = ProductValue::Selected(index);
                true
            }
            _ => false,
        }
    }

    /// Move the selection by `step` enabled options, wrapping around.
    pub fn cycle_product(&mut self, step: isize) -> bool {
        let ProductField::Selector(selector) = &self.description.product else {
            return false;
        };
        let Some(current) = self.selected_product_index() else {
            return false;
        };
        let enabled: Vec<usize> = selector
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_disabled())
            .map(|(i, _)| i)
            .collect();
        if enabled.is_empty() {
            return false;
        }
        let next = match enabled.iter().position(|&i| i == current) {
            Some(pos) => {
                let len = enabled.len() as isize;
                enabled[(pos as isize + step).rem_euclid(len) as usize]
            }
            // Sitting on the placeholder: forward picks the first option,
            // backward the last.
            None if step >= 0 => enabled[0],
            None => enabled[enabled.len() - 1],
        };
        self.select_product(next)
    }

    fn product_value(&self) -> String {
        match (&self.product, &self.description.product) {
            (ProductValue::Locked(value), _) => value.clone(),
            (ProductValue::Selected(index), ProductField::Selector(selector)) => selector
                .options
                .get(*index)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            (ProductValue::Selected(_), ProductField::Locked(value)) => value.clone(),
        }
    }

    /// Snapshot the live values into a payload without touching the control.
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            product_interest: self.product_value(),
            quantity: parse_quantity(&self.quantity),
            confirmed: self.description.is_confirmation().then_some(true),
        }
    }

    /// Lock the submit control and return the payload to send.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitError> {
        if !self.control.is_enabled() {
            return Err(SubmitError::AlreadySubmitted(self.id));
        }
        self.control = SubmitControl::Submitted;
        Ok(self.payload())
    }

    /// Re-enable the control after the submission failed.
    pub fn fail_submit(&mut self) {
        self.control = SubmitControl::Retry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCatalog;
    use crate::form::FormPrefill;
    use pretty_assertions::assert_eq;

    fn block(prefill: FormPrefill, mode: FormMode) -> FormBlock {
        FormBlock::new(
            FormId(1),
            FormDescription::describe(&prefill, mode, &ProductCatalog::default()),
        )
    }

    #[test]
    fn quantity_submits_leading_integer_or_one() {
        let mut form = block(FormPrefill::default(), FormMode::Edit);
        form.set_text(FieldKey::Quantity, "");
        assert_eq!(form.payload().quantity, 1);
        form.set_text(FieldKey::Quantity, "four");
        assert_eq!(form.payload().quantity, 1);
        form.set_text(FieldKey::Quantity, "4");
        assert_eq!(form.payload().quantity, 4);
        form.set_text(FieldKey::Quantity, "-3");
        assert_eq!(form.payload().quantity, -3);
        form.set_text(FieldKey::Quantity, "5000000000");
        assert_eq!(form.payload().quantity, 5_000_000_000);
    }

    #[test]
    fn payload_reads_live_values_not_prefill() {
        let mut form = block(
            FormPrefill {
                full_name: "Ada".to_string(),
                ..FormPrefill::default()
            },
            FormMode::Edit,
        );
        form.set_text(FieldKey::FullName, "Ada Lovelace");
        form.select_product(2);
        let payload = form.payload();
        assert_eq!(payload.full_name, "Ada Lovelace");
        assert_eq!(payload.product_interest, "Classic Chesterfield");
        assert_eq!(payload.confirmed, None);
    }

    #[test]
    fn locked_product_cannot_change() {
        let mut form = block(
            FormPrefill::default().with_product("The Cloud Sofa"),
            FormMode::Edit,
        );
        assert!(form.is_product_locked());
        assert!(!form.select_product(1));
        assert!(!form.cycle_product(1));
        assert!(!form.set_text(FieldKey::ProductInterest, "Velvet Armchair"));
        assert_eq!(form.payload().product_interest, "The Cloud Sofa");
    }

    #[test]
    fn placeholder_cannot_be_reselected() {
        let mut form = block(FormPrefill::default(), FormMode::Edit);
        assert_eq!(form.payload().product_interest, "");
        assert!(form.select_product(1));
        assert!(!form.select_product(0));
        assert_eq!(form.payload().product_interest, "The Cloud Sofa");
    }

    #[test]
    fn cycling_skips_placeholder_and_wraps() {
        let mut form = block(FormPrefill::default(), FormMode::Edit);
        assert!(form.cycle_product(1));
        assert_eq!(form.selected_product_index(), Some(1));
        assert!(form.cycle_product(-1));
        assert_eq!(form.value(FieldKey::ProductInterest), "Other");
        assert!(form.cycle_product(1));
        assert_eq!(form.selected_product_index(), Some(1));
    }

    #[test]
    fn confirm_mode_flags_payload() {
        let mut form = block(FormPrefill::default(), FormMode::Confirm);
        assert_eq!(form.submit_label(), "Confirm Order");
        let payload = form.begin_submit().ok();
        assert_eq!(payload.and_then(|p| p.confirmed), Some(true));
        assert_eq!(form.submit_label(), "Confirmed!");
    }

    #[test]
    fn double_submit_is_refused_until_failure() {
        let mut form = block(FormPrefill::default(), FormMode::Edit);
        assert!(form.begin_submit().is_ok());
        assert_eq!(form.submit_label(), "Sent!");
        assert!(matches!(
            form.begin_submit(),
            Err(SubmitError::AlreadySubmitted(FormId(1)))
        ));
        form.fail_submit();
        assert_eq!(form.submit_label(), "Try Again");
        form.set_text(FieldKey::Email, "new@example.com");
        let retry = form.begin_submit().ok();
        assert_eq!(retry.map(|p| p.email), Some("new@example.com".to_string()));
    }

    #[test]
    fn identical_blocks_are_independent() {
        let description = FormDescription::describe(
            &FormPrefill::default(),
            FormMode::Edit,
            &ProductCatalog::default(),
        );
        let mut first = FormBlock::new(FormId(1), description.clone());
        let second = FormBlock::new(FormId(2), description);
        first.set_text(FieldKey::Phone, "555");
        assert!(first.begin_submit().is_ok());
        assert_eq!(second.control(), SubmitControl::Ready);
        assert_eq!(second.value(FieldKey::Phone), "");
    }
}
