use std::fmt::Display;

/// 目标主机描述，只用于默认字典查询
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Host {
    pub host: String,
    pub port: u16,
    pub service: String,
}

impl Host {
    pub fn new(host: impl Into<String>, port: u16, service: impl Into<String>) -> Self {
        Host {
            host: host.into(),
            port,
            service: service.into(),
        }
    }
}

impl Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}:{}", self.service, self.host, self.port)
    }
}
