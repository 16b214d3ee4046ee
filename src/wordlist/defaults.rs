use lazy_static::lazy_static;
use std::collections::HashMap;

/// 默认字典查询接口：(版本提示, 服务名) -> 有序候选列表
pub trait WordlistProvider: Send + Sync {
    fn users(&self, version: &str, service: &str) -> Vec<String>;
    fn passwords(&self, version: &str, service: &str) -> Vec<String>;
}

struct ServiceWordlist {
    users: &'static [&'static str],
    passwords: &'static [&'static str],
}

const COMMON_PASSWORDS: &[&str] = &[
    "", "123456", "password", "admin", "root", "12345678", "qwerty", "111111", "123123",
];

lazy_static! {
    static ref BUILTIN_WORDLISTS: HashMap<&'static str, ServiceWordlist> = {
        let mut m = HashMap::new();
        m.insert("ssh", ServiceWordlist {
            users: &["root", "admin", "user", "ubuntu", "pi", "oracle"],
            passwords: COMMON_PASSWORDS,
        });
        m.insert("ftp", ServiceWordlist {
            users: &["anonymous", "ftp", "admin", "root", "user"],
            passwords: COMMON_PASSWORDS,
        });
        m.insert("telnet", ServiceWordlist {
            users: &["root", "admin", "user", "guest"],
            passwords: COMMON_PASSWORDS,
        });
        m.insert("mysql", ServiceWordlist {
            users: &["root", "mysql", "admin"],
            passwords: COMMON_PASSWORDS,
        });
        m.insert("postgres", ServiceWordlist {
            users: &["postgres", "admin", "root"],
            passwords: &["", "postgres", "password", "admin", "123456"],
        });
        m.insert("mssql", ServiceWordlist {
            users: &["sa", "admin", "administrator"],
            passwords: &["", "sa", "password", "Password123", "admin"],
        });
        m.insert("rdp", ServiceWordlist {
            users: &["administrator", "admin", "user"],
            passwords: &["", "password", "Password1", "admin", "123456"],
        });
        m.insert("smtp", ServiceWordlist {
            users: &["admin", "postmaster", "root", "test"],
            passwords: COMMON_PASSWORDS,
        });
        m.insert("rtsp", ServiceWordlist {
            users: &["admin", "root", "user", "888888", "666666"],
            passwords: &["", "admin", "12345", "123456", "888888", "666666", "password"],
        });
        m.insert("vnc", ServiceWordlist {
            users: &[""],
            passwords: &["", "password", "vnc", "123456", "admin"],
        });
        m.insert("snmp", ServiceWordlist {
            users: &[""],
            passwords: &["public", "private", "community", "manager", "cisco"],
        });
        m.insert("default", ServiceWordlist {
            users: &["root", "admin"],
            passwords: COMMON_PASSWORDS,
        });
        m
    };
}

/// 只使用密码认证的服务（没有用户名）
pub fn is_password_only_service(service: &str) -> bool {
    matches!(service.to_ascii_lowercase().as_str(), "vnc" | "snmp")
}

/// 内置默认字典，按服务名查找，未知服务使用 default 列表
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinWordlists;

impl BuiltinWordlists {
    fn lookup(service: &str) -> &'static ServiceWordlist {
        let key = service.to_ascii_lowercase();
        match BUILTIN_WORDLISTS.get(key.as_str()) {
            Some(list) => list,
            None => {
                log::debug!("No builtin wordlist for service {}, using default", service);
                &BUILTIN_WORDLISTS["default"]
            }
        }
    }
}

impl WordlistProvider for BuiltinWordlists {
    // 内置字典与版本无关
    fn users(&self, _version: &str, service: &str) -> Vec<String> {
        Self::lookup(service).users.iter().map(|s| s.to_string()).collect()
    }

    fn passwords(&self, _version: &str, service: &str) -> Vec<String> {
        Self::lookup(service)
            .passwords
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// 固定字典，忽略版本和服务名
#[derive(Debug, Clone, Default)]
pub struct StaticWordlists {
    pub users: Vec<String>,
    pub passwords: Vec<String>,
}

impl StaticWordlists {
    pub fn new<U, P>(users: U, passwords: P) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        StaticWordlists {
            users: users.into_iter().map(Into::into).collect(),
            passwords: passwords.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordlistProvider for StaticWordlists {
    fn users(&self, _version: &str, _service: &str) -> Vec<String> {
        self.users.clone()
    }

    fn passwords(&self, _version: &str, _service: &str) -> Vec<String> {
        self.passwords.clone()
    }
}
