use crate::config::EngineConfig;
use crate::errors::{CredError, Result};
use crate::iterator::host::Host;
use crate::iterator::line_source::FileLines;
use crate::iterator::source::{
    CredentialSource, SourceCursor, resolve_combo, resolve_password, resolve_user,
};
use crate::wordlist::{BuiltinWordlists, WordlistProvider};
use log::{debug, error, warn};
use std::fmt::{self, Display};
use std::sync::Arc;

/// 一组待尝试的用户名和密码
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.username, self.password)
    }
}

/// 迭代模式
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IterationMode {
    /// 预先配对的 user:password
    Combo,
    /// 只有密码（VNC、SNMP 等）
    PasswordOnly,
    /// 用户名 x 密码 的笛卡尔积
    Standard,
}

/// 迭代器配置，构造后不再修改
#[derive(Clone)]
pub struct IteratorConfig {
    pub host: Host,
    pub user: String,
    pub password: String,
    pub combo: String,
    pub version: String,
    pub password_only: bool,
    pub engine: EngineConfig,
    pub wordlists: Arc<dyn WordlistProvider>,
}

impl IteratorConfig {
    pub fn new(
        host: Host,
        user: &str,
        password: &str,
        combo: &str,
        version: &str,
        password_only: bool,
    ) -> Self {
        IteratorConfig {
            host,
            user: user.to_string(),
            password: password.to_string(),
            combo: combo.to_string(),
            version: version.to_string(),
            password_only,
            engine: EngineConfig::default(),
            wordlists: Arc::new(BuiltinWordlists),
        }
    }

    /// 设置引擎配置（分块、行长限制、空密码策略）
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// 设置默认字典来源
    pub fn with_wordlists(mut self, wordlists: Arc<dyn WordlistProvider>) -> Self {
        self.wordlists = wordlists;
        self
    }

    pub fn is_combo_mode(&self) -> bool {
        !self.combo.is_empty()
    }

    pub fn mode(&self) -> IterationMode {
        if self.is_combo_mode() {
            IterationMode::Combo
        } else if self.password_only {
            IterationMode::PasswordOnly
        } else {
            IterationMode::Standard
        }
    }
}

impl fmt::Debug for IteratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password)
            .field("combo", &self.combo)
            .field("version", &self.version)
            .field("password_only", &self.password_only)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// 一次 pull 的结果
#[derive(Debug)]
pub enum Pull {
    Credential(Credential),
    Exhausted,
    /// 因错误终止，之后的 pull 都返回 `Exhausted`
    Failed(CredError),
}

/// 凭据迭代器 - 按需生成用户名和密码组合，不把字典整个读入内存
///
/// 第一次 `pull` 时才解析数据源、打开文件。标准模式下用户名是外层、密码是内层，
/// 内层读完后重置到开头再前进外层。
pub struct CredentialIterator {
    config: IteratorConfig,
    initialized: bool,
    done: bool,
    current_user: Option<String>,
    users: Option<SourceCursor>,
    passwords: Option<SourceCursor>,
    combo: Option<SourceCursor>,
    combo_pair: Option<Credential>,
}

impl CredentialIterator {
    pub fn new(
        host: Host,
        user: &str,
        password: &str,
        combo: &str,
        version: &str,
        password_only: bool,
    ) -> Self {
        Self::from_config(IteratorConfig::new(
            host,
            user,
            password,
            combo,
            version,
            password_only,
        ))
    }

    pub fn from_config(config: IteratorConfig) -> Self {
        CredentialIterator {
            config,
            initialized: false,
            done: false,
            current_user: None,
            users: None,
            passwords: None,
            combo: None,
            combo_pair: None,
        }
    }

    pub fn config(&self) -> &IteratorConfig {
        &self.config
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    // 第一次 pull 时初始化
    fn initialize(&mut self) -> Result<()> {
        let mode = self.config.mode();
        match mode {
            IterationMode::Combo => self.initialize_combo()?,
            IterationMode::PasswordOnly => {
                let passwords = resolve_password(&self.config);
                debug!("Password source: {}", passwords.kind());
                self.passwords = Some(passwords.open(&self.config.engine)?);
            }
            IterationMode::Standard => {
                let users = resolve_user(&self.config);
                let passwords = resolve_password(&self.config);
                debug!(
                    "User source: {}, password source: {}",
                    users.kind(),
                    passwords.kind()
                );
                self.users = Some(users.open(&self.config.engine)?);
                self.passwords = Some(passwords.open(&self.config.engine)?);
            }
        }
        debug!(
            "Credential iterator initialized in {:?} mode for {}",
            mode, self.config.host
        );
        Ok(())
    }

    fn initialize_combo(&mut self) -> Result<()> {
        if let Some(CredentialSource::File(path)) = resolve_combo(&self.config) {
            let lines = FileLines::open(&path, &self.config.engine)?;
            self.combo = Some(SourceCursor::File(lines));
            return Ok(());
        }

        // 单个组合值必须包含冒号
        let (user, password) = self.config.combo.split_once(':').ok_or_else(|| {
            CredError::ConfigError("invalid combo format, expected user:password".to_string())
        })?;
        self.combo_pair = Some(Credential::new(user, password));
        Ok(())
    }

    /// 取下一组凭据
    pub fn pull(&mut self) -> Pull {
        if self.done {
            return Pull::Exhausted;
        }

        if !self.initialized {
            self.initialized = true;
            if let Err(e) = self.initialize() {
                error!("Error initializing credential iterator: {}", e);
                return self.fail(e);
            }
        }

        let next = match self.config.mode() {
            IterationMode::Combo => self.next_combo(),
            IterationMode::PasswordOnly => self.next_password_only(),
            IterationMode::Standard => self.next_standard(),
        };

        match next {
            Ok(Some(credential)) => Pull::Credential(credential),
            Ok(None) => {
                self.done = true;
                Pull::Exhausted
            }
            Err(e) => {
                error!("Error reading credentials: {}", e);
                self.fail(e)
            }
        }
    }

    fn fail(&mut self, e: CredError) -> Pull {
        self.done = true;
        Pull::Failed(e)
    }

    fn next_combo(&mut self) -> Result<Option<Credential>> {
        if let Some(cursor) = self.combo.as_mut() {
            while let Some(line) = cursor.next_value()? {
                let Some((user, password)) = line.split_once(':') else {
                    warn!("{}, skipping", CredError::FormatError(line.clone()));
                    continue;
                };
                return Ok(Some(Credential::new(user, password)));
            }
            return Ok(None);
        }

        // 单个组合值只返回一次
        Ok(self.combo_pair.take())
    }

    fn next_password_only(&mut self) -> Result<Option<Credential>> {
        let Some(passwords) = self.passwords.as_mut() else {
            return Ok(None);
        };
        Ok(passwords
            .next_value()?
            .map(|password| Credential::new("", password)))
    }

    fn next_standard(&mut self) -> Result<Option<Credential>> {
        let (Some(users), Some(passwords)) = (self.users.as_mut(), self.passwords.as_mut()) else {
            return Ok(None);
        };

        let current_user = match self.current_user.take() {
            Some(user) => user,
            None => match users.next_value()? {
                Some(user) => user,
                None => return Ok(None),
            },
        };

        if let Some(password) = passwords.next_value()? {
            let credential = Credential::new(current_user.clone(), password);
            self.current_user = Some(current_user);
            return Ok(Some(credential));
        }

        // 当前用户的密码已经用完：重置密码流，切换到下一个用户
        passwords.reset()?;
        let Some(next_user) = users.next_value()? else {
            return Ok(None);
        };

        match passwords.next_value()? {
            Some(password) => {
                self.current_user = Some(next_user.clone());
                Ok(Some(Credential::new(next_user, password)))
            }
            // 密码源为空，乘积为空
            None => Ok(None),
        }
    }

    /// 释放所有句柄，可重复调用；多个错误时返回第一个，其余照常释放
    pub fn close(&mut self) -> Result<()> {
        self.done = true;
        let mut first_error: Option<CredError> = None;

        for cursor in [self.users.take(), self.passwords.take(), self.combo.take()] {
            let Some(mut cursor) = cursor else {
                continue;
            };
            if let Err(e) = cursor.close() {
                warn!("Failed to close credential source: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Iterator for CredentialIterator {
    type Item = Credential;

    // 出错已经记录日志，这里和读完一样结束
    fn next(&mut self) -> Option<Self::Item> {
        match self.pull() {
            Pull::Credential(credential) => Some(credential),
            Pull::Exhausted | Pull::Failed(_) => None,
        }
    }
}

impl Drop for CredentialIterator {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("Error closing credential iterator: {}", e);
        }
    }
}
