use std::time::Duration;

use async_trait::async_trait;
use fireboard::Device;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::{Binding, Config, ConfigError, Host, LocalId, Reconciler, Result};

const POLL_GRANULARITY: Duration = Duration::from_secs(1);

/// The slice of the FireBoard API the bridge needs.
#[async_trait]
pub trait Cloud: Send + Sync {
    async fn login(&mut self, username: &str, password: &str) -> fireboard::Result<()>;
    fn logout(&mut self);
    fn is_logged_in(&self) -> bool;
    async fn list_devices(&self) -> fireboard::Result<Vec<Device>>;
}

#[async_trait]
impl Cloud for fireboard::Client {
    async fn login(&mut self, username: &str, password: &str) -> fireboard::Result<()> {
        fireboard::Client::login(self, username, password).await?;
        Ok(())
    }

    fn logout(&mut self) {
        fireboard::Client::logout(self)
    }

    fn is_logged_in(&self) -> bool {
        fireboard::Client::is_logged_in(self)
    }

    async fn list_devices(&self) -> fireboard::Result<Vec<Device>> {
        fireboard::Client::list_devices(self).await
    }
}

/// Callbacks the host invokes over the lifetime of the plugin.
#[async_trait]
pub trait Plugin {
    async fn start(&mut self);
    fn stop(&mut self);
    async fn bind(&mut self, binding: Binding, id: LocalId) -> Result<()>;
    fn unbind(&mut self, binding: &Binding) -> Result<LocalId>;
    async fn tick(&mut self);
}

#[derive(Debug)]
pub enum Event {
    Bind(Binding, LocalId),
    Unbind(Binding),
    Dump,
    Shutdown,
}

pub struct Bridge<C, H> {
    cloud: C,
    host: H,
    config: Config,
    reconciler: Reconciler,
    next_update: Instant,
}

impl<C: Cloud, H: Host + Send> Bridge<C, H> {
    pub fn new(cloud: C, host: H, config: Config) -> Self {
        Self {
            cloud,
            host,
            config,
            reconciler: Reconciler::new(),
            next_update: Instant::now(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_update
    }

    /// Applies new preferences. Invalid values and rejected credentials are
    /// reported per setting and leave the current preferences in place.
    pub async fn reconfigure(&mut self, config: Config) -> std::result::Result<(), ConfigError> {
        config.validate()?;

        if let Err(err) = self.cloud.login(&config.username, &config.password).await {
            error!("FireBoard login failure: {err}");
            return Err(ConfigError::login_failed());
        }

        debug!("update frequency {} min", config.update_frequency);
        self.config = config;
        self.tick().await;

        Ok(())
    }

    pub fn dump(&self) {
        match self.reconciler.dump() {
            Ok(dump) => info!("devices:\n{dump}"),
            Err(err) => error!("unable to dump devices: {err}"),
        }
    }

    /// Polls until a shutdown event arrives, checking once per second whether
    /// the next poll is due. Polling goes on if every sender is gone.
    pub async fn run(&mut self, mut events: mpsc::Receiver<Event>) {
        let mut listening = true;

        loop {
            if self.is_due(Instant::now()) {
                self.tick().await;
            }

            tokio::select! {
                event = events.recv(), if listening => match event {
                    Some(Event::Bind(binding, id)) => {
                        if let Err(err) = self.bind(binding, id).await {
                            error!("Error binding device: {err}");
                        }
                    }
                    Some(Event::Unbind(binding)) => {
                        if let Err(err) = self.unbind(&binding) {
                            error!("Error unbinding device: {err}");
                        }
                    }
                    Some(Event::Dump) => self.dump(),
                    Some(Event::Shutdown) => break,
                    None => {
                        warn!("event channel closed, polling without events");
                        listening = false;
                    }
                },
                _ = time::sleep(POLL_GRANULARITY) => (),
            }
        }

        self.stop();
    }
}

#[async_trait]
impl<C: Cloud, H: Host + Send> Plugin for Bridge<C, H> {
    async fn start(&mut self) {
        info!("starting FireBoard");
        debug!("update frequency {} min", self.config.update_frequency);

        let login = self
            .cloud
            .login(&self.config.username, &self.config.password)
            .await;

        match login {
            Ok(()) => self.tick().await,
            Err(err) => error!("FireBoard login failure: {err}"),
        }
    }

    fn stop(&mut self) {
        info!("shutting down FireBoard");
        self.cloud.logout();
    }

    async fn bind(&mut self, binding: Binding, id: LocalId) -> Result<()> {
        self.reconciler.bind(binding, id)?;
        self.tick().await;
        Ok(())
    }

    fn unbind(&mut self, binding: &Binding) -> Result<LocalId> {
        self.reconciler.unbind(binding)
    }

    async fn tick(&mut self) {
        self.next_update = Instant::now() + self.config.update_interval();

        if !self.cloud.is_logged_in() {
            debug!("not logged in, skipping update");
            return;
        }

        match self.cloud.list_devices().await {
            Ok(devices) => self.reconciler.apply(devices, &mut self.host),
            Err(err) => error!("Error fetching devices: {err}"),
        }
    }
}
