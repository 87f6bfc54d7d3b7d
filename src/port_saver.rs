use rocket::fairing::Info;
use rocket::{Orbit, Rocket};
use tokio::sync::watch;

pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = watch::channel(None);
    (PortSaver { sender: tx }, Port { receiver: rx })
}

/// Handle to the port the server actually bound, needed when the
/// configuration asks for an ephemeral port.
pub struct Port {
    receiver: watch::Receiver<Option<u16>>,
}

impl Port {
    pub async fn get(&mut self) -> u16 {
        loop {
            if let Some(port) = *self.receiver.borrow() {
                return port;
            }
            self.receiver
                .changed()
                .await
                .expect("The server was dropped before lift-off.");
        }
    }
}

pub struct PortSaver {
    sender: watch::Sender<Option<u16>>,
}

#[rocket::async_trait]
impl rocket::fairing::Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: rocket::fairing::Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let _ = self.sender.send(Some(rocket.config().port));
    }
}
