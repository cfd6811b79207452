use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Customer to register with the processor. The same address is used for
/// billing and shipping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub address: Address,
}

impl NewCustomer {
    /// Flatten into Stripe's bracketed form-field notation
    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("name".to_string(), self.name.clone()),
            ("email".to_string(), self.email.clone()),
            ("shipping[name]".to_string(), self.name.clone()),
        ];
        for prefix in ["address", "shipping[address]"] {
            let a = &self.address;
            for (field, value) in [
                ("line1", &a.line1),
                ("city", &a.city),
                ("state", &a.state),
                ("postal_code", &a.postal_code),
                ("country", &a.country),
            ] {
                fields.push((format!("{prefix}[{field}]"), value.clone()));
            }
        }
        fields
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerResponse {
    pub(crate) id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentIntentResponse {
    pub(crate) client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
}
