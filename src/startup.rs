use crate::catchers::*;
use crate::configuration::Settings;
use crate::oauth::TokenProvider;
use crate::port_saver;
use crate::port_saver::Port;
use crate::profile::ProfileStore;
use crate::push::Push;
use crate::routes::health_check::health_check;
use crate::routes::notify::notify;
use rocket::{Config, Ignite, Rocket};
use std::sync::Arc;

pub async fn build(
    configuration: &Settings,
    profile_store: Box<dyn ProfileStore>,
    token_provider: Box<dyn TokenProvider>,
    push_client: Box<dyn Push>,
) -> Result<(Rocket<Ignite>, Port), rocket::Error> {
    let (port_saver, port) = port_saver::create_pair();
    rocket::custom(Config {
        port: configuration.application.port.unwrap_or(0),
        address: configuration.application.host,
        ..Config::debug_default()
    })
    .attach(port_saver)
    .manage::<Arc<dyn ProfileStore>>(Arc::from(profile_store))
    .manage::<Arc<dyn TokenProvider>>(Arc::from(token_provider))
    .manage::<Arc<dyn Push>>(Arc::from(push_client))
    .mount("/", routes![health_check, notify])
    .register("/", catchers![unprocessable_entity_to_bad_request])
    .ignite()
    .await
    .map(|rocket| (rocket, port))
}
