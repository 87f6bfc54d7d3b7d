use anyhow::Context;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub profile_store: ProfileStoreSettings,
    pub push: PushSettings,
    pub service_account: ServiceAccountSettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    pub host: IpAddr,
}

#[derive(serde::Deserialize)]
pub struct ProfileStoreSettings {
    pub base_url: String,
    pub service_role_key: Secret<String>,
    pub table: String,
    pub id_column: String,
    pub token_column: String,
}

#[derive(serde::Deserialize)]
pub struct PushSettings {
    pub base_url: String,
}

#[derive(serde::Deserialize)]
pub struct ServiceAccountSettings {
    pub path: PathBuf,
}

/// The provisioned signing credential, in the layout the identity provider
/// hands out: issuer identity plus the RSA key it will verify signatures
/// against.
#[derive(serde::Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: Secret<String>,
    pub token_uri: String,
}

impl ServiceAccount {
    pub fn load(path: &Path) -> Result<ServiceAccount, anyhow::Error> {
        let contents = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read the service account file at {}.",
                path.display()
            )
        })?;
        serde_json::from_str(&contents).context("Failed to parse the service account file.")
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");

    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;
    settings.try_into()
}
