//! Contract with the ViaCEP address lookup. Lookups are best-effort: callers
//! drop every failure and the checkout carries on without an address.

use serde::Deserialize;
use serde_json::Value;

use crate::validator::digits_only;

pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Lookup URL for `cep`, or `None` when it does not hold exactly 8 digits.
pub fn lookup_url(cep: &str) -> Option<String> {
    let digits = digits_only(cep);
    (digits.len() == 8).then(|| format!("{VIACEP_BASE_URL}/{digits}/json/"))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    // `true` on older deployments, `"true"` on newer ones
    #[serde(default)]
    pub erro: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
}

impl ViaCepResponse {
    pub fn is_error(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    pub fn into_address(self) -> Option<Address> {
        if self.is_error() {
            return None;
        }
        Some(Address {
            street: self.logradouro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            state: self.uf.unwrap_or_default(),
        })
    }
}

/// Decodes a lookup body; anything unreadable counts as "no address".
pub fn parse_lookup(body: &str) -> Option<Address> {
    serde_json::from_str::<ViaCepResponse>(body)
        .ok()
        .and_then(ViaCepResponse::into_address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_only_for_eight_digits() {
        assert_eq!(
            lookup_url("01310-100").as_deref(),
            Some("https://viacep.com.br/ws/01310100/json/")
        );
        assert_eq!(lookup_url("0131010"), None);
        assert_eq!(lookup_url(""), None);
    }

    #[test]
    fn parses_found_address() {
        let body = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        }"#;
        assert_eq!(
            parse_lookup(body),
            Some(Address {
                street: "Avenida Paulista".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
            })
        );
    }

    #[test]
    fn missing_fields_become_empty() {
        let address = parse_lookup(r#"{"localidade": "Curitiba", "uf": "PR"}"#).unwrap();
        assert_eq!(address.street, "");
        assert_eq!(address.city, "Curitiba");
    }

    #[test]
    fn error_flag_in_both_shapes() {
        assert_eq!(parse_lookup(r#"{"erro": true}"#), None);
        assert_eq!(parse_lookup(r#"{"erro": "true"}"#), None);
    }

    #[test]
    fn garbage_is_swallowed() {
        assert_eq!(parse_lookup("<html>bad gateway</html>"), None);
    }
}
