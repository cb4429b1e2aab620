//! Location selection model and the fixed state table

use serde::{Deserialize, Serialize};

/// The user's selected state/city pair.
///
/// The city is only meaningful paired with its state. This is persisted
/// verbatim as the `lastLocation` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    /// State code (UF), e.g. "SP"
    pub uf: String,
    /// City name, e.g. "São Paulo"
    pub city: String,
}

impl LocationSelection {
    /// Create a new selection
    #[must_use]
    pub fn new(uf: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            uf: uf.into(),
            city: city.into(),
        }
    }

    /// Derive a selection from the weather endpoint's human-readable
    /// `"City, UF"` label plus its plain city name.
    ///
    /// The label format is not guaranteed by the API; a label without the
    /// `", UF"` suffix yields `None` and the caller skips persistence.
    #[must_use]
    pub fn from_label(label: &str, city_name: &str) -> Option<Self> {
        let (_, uf) = label.rsplit_once(", ")?;
        let uf = uf.trim();
        if uf.is_empty() || city_name.is_empty() {
            return None;
        }
        Some(Self::new(uf, city_name))
    }
}

/// One entry in the city picker, derived from the region directory response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityOption {
    /// Name shown in the picker
    pub label: String,
    /// Value submitted on selection
    pub value: String,
}

impl CityOption {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            value: name,
        }
    }
}

/// Fixed list of first-level administrative regions (UF code, display name).
pub const STATES: &[(&str, &str)] = &[
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

/// Look up the display name for a state code.
#[must_use]
pub fn state_name(uf: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(code, _)| *code == uf)
        .map(|(_, name)| *name)
}
