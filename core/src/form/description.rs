use crate::catalog::ProductCatalog;

use super::FieldKey;
use super::FormMode;
use super::FormPrefill;

/// Label of the sentinel option shown after the catalog entries.
pub const OTHER_LABEL: &str = "Other";

/// What kind of input a text field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputKind {
    Text,
    Email,
    Tel,
    Number,
}

/// A free-text input with its starting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub key: FieldKey,
    pub kind: TextInputKind,
    pub value: String,
}

impl TextField {
    pub fn placeholder(&self) -> &'static str {
        self.key.placeholder()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Disabled "Select Product" entry; never selectable by the user.
    Placeholder,
    Catalog,
    /// The trailing "Other" entry, possibly carrying a non-catalog value.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub kind: OptionKind,
    pub label: String,
    pub value: String,
}

impl ProductOption {
    pub fn is_disabled(&self) -> bool {
        matches!(self.kind, OptionKind::Placeholder)
    }
}

/// Editable product list: placeholder, catalog entries, then "Other".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSelector {
    pub options: Vec<ProductOption>,
    pub selected: usize,
}

impl ProductSelector {
    pub fn selected_option(&self) -> Option<&ProductOption> {
        self.options.get(self.selected)
    }
}

/// The product field is either fixed to a known catalog entry or editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductField {
    Locked(String),
    Selector(ProductSelector),
}

impl ProductField {
    /// Decide how the product field renders for a prefilled value.
    ///
    /// An exact catalog match locks the field. Otherwise the selector is
    /// shown: an empty value selects the disabled placeholder, and any other
    /// value is carried by a pre-selected "Other" option so it survives a
    /// resubmit unchanged.
    pub fn decide(product_interest: &str, catalog: &ProductCatalog) -> Self {
        if catalog.contains(product_interest) {
            return ProductField::Locked(product_interest.to_string());
        }

        let mut options = Vec::with_capacity(catalog.len() + 2);
        options.push(ProductOption {
            kind: OptionKind::Placeholder,
            label: FieldKey::ProductInterest.placeholder().to_string(),
            value: String::new(),
        });
        options.extend(catalog.options().map(|name| ProductOption {
            kind: OptionKind::Catalog,
            label: name.to_string(),
            value: name.to_string(),
        }));

        let other_index = options.len();
        let (other, selected) = if product_interest.is_empty() {
            (
                ProductOption {
                    kind: OptionKind::Other,
                    label: OTHER_LABEL.to_string(),
                    value: OTHER_LABEL.to_string(),
                },
                0,
            )
        } else {
            (
                ProductOption {
                    kind: OptionKind::Other,
                    label: product_interest.to_string(),
                    value: product_interest.to_string(),
                },
                other_index,
            )
        };
        options.push(other);

        ProductField::Selector(ProductSelector { options, selected })
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, ProductField::Locked(_))
    }
}

/// Everything needed to draw one form, decided without any UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescription {
    pub text_fields: Vec<TextField>,
    pub product: ProductField,
    pub quantity: i64,
    pub mode: FormMode,
}

impl FormDescription {
    pub fn describe(prefill: &FormPrefill, mode: FormMode, catalog: &ProductCatalog) -> Self {
        let text_field = |key: FieldKey, kind: TextInputKind| TextField {
            key,
            kind,
            value: prefill.text(key).to_string(),
        };
        Self {
            text_fields: vec![
                text_field(FieldKey::FullName, TextInputKind::Text),
                text_field(FieldKey::Email, TextInputKind::Email),
                text_field(FieldKey::Phone, TextInputKind::Tel),
                text_field(FieldKey::Address, TextInputKind::Text),
            ],
            product: ProductField::decide(&prefill.product_interest, catalog),
            quantity: if prefill.quantity == 0 { 1 } else { prefill.quantity },
            mode,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        self.mode.submit_label()
    }

    pub fn is_confirmation(&self) -> bool {
        self.mode.is_confirm()
    }
}
