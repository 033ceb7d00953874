use serde::Deserialize;

/// Subset of the Google People API `people/me` response consumed by the
/// profile resolver. Every candidate list may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub names: Vec<PersonName>,
    pub email_addresses: Vec<PersonEmail>,
    pub photos: Vec<PersonPhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonName {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonEmail {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonPhoto {
    pub url: Option<String>,
}
