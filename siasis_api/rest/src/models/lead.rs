use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use siasis_models::submission::RawSubmission;

/// Body of the landing page form.
///
/// Fields that are missing, `null` or not a string are all treated as absent
/// and reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmission {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nombre_completo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cargo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub institucion: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mensaje: Option<String>,
}

impl From<ApiSubmission> for RawSubmission {
    fn from(value: ApiSubmission) -> Self {
        Self {
            full_name: value.nombre_completo,
            role_title: value.cargo,
            email: value.email,
            phone: value.telefono,
            institution: value.institucion,
            message: value.mensaje,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmittedLead {
    pub nombre_completo: String,
    pub institucion: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}
