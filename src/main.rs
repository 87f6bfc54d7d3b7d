use anyhow::Context;
use push_relay::configuration::{get_configuration, ServiceAccount};
use push_relay::oauth::JwtTokenProvider;
use push_relay::profile::PostgrestProfileStore;
use push_relay::push::FcmPushClient;
use push_relay::startup::build;
use push_relay::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("push-relay".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let service_account = ServiceAccount::load(&configuration.service_account.path)?;

    let profile_store = PostgrestProfileStore::new(&configuration.profile_store)?;
    let token_provider = JwtTokenProvider::new(&service_account)?;
    let push_client = FcmPushClient::new(&configuration.push, service_account.project_id.clone());

    let (rocket, _port) = build(
        &configuration,
        Box::new(profile_store),
        Box::new(token_provider),
        Box::new(push_client),
    )
    .await?;
    rocket.launch().await?;
    Ok(())
}
