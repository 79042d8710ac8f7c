use rally_session_core::application::runtime::{DEFAULT_BATCH_SIZE, DEFAULT_QUEUE_SIZE};
use rally_session_core::domain::DEFAULT_MAX_MEMBERS;
use rally_session_core::application::DEFAULT_SCENE;
use rally_session_core::RouterConfig;
use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7000;

/// Configuration for hosting or joining a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Address to bind (authority) or dial (member)
    pub address: String,

    pub port: u16,

    /// Member capacity of the directory
    pub max_members: usize,

    /// Scene members load when the game starts
    pub scene: String,

    /// Member-side connect and handshake timeout
    pub connect_timeout: Duration,

    /// Authority polling interval
    pub poll_interval: Duration,

    /// Abort armed rounds after this long (`None`: never)
    pub ready_timeout: Option<Duration>,

    pub queue_size: usize,
    pub batch_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_members: DEFAULT_MAX_MEMBERS,
            scene: DEFAULT_SCENE.to_string(),
            connect_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(50),
            ready_timeout: None,
            queue_size: DEFAULT_QUEUE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SessionConfig {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            ..Default::default()
        }
    }

    /// `address:port`
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Router settings derived from this config
    pub fn router_config(&self) -> RouterConfig {
        let config = RouterConfig::default()
            .with_scene(self.scene.clone())
            .with_max_members(self.max_members);

        match self.ready_timeout {
            Some(timeout) => config.with_ready_timeout(timeout),
            None => config,
        }
    }

    pub fn with_max_members(mut self, max_members: usize) -> Self {
        self.max_members = max_members;
        self
    }

    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = scene.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = Some(timeout);
        self
    }

    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
