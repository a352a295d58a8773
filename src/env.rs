use std::{borrow::Cow, collections::HashMap, ffi::{OsStr, OsString}, hash::BuildHasher, sync::Mutex};

use crate::{options::DEFAULT_PATH, Error, Result};

/// Read side of an environment. The resolver only ever reads the ambient
/// environment, so most call sites take `&dyn GetEnv`.
pub trait GetEnv {
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>>;

    #[inline]
    fn get_config_path(&self) -> Cow<'_, OsStr> {
        self.get("DOTENV_CONFIG_PATH".as_ref())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| {
                Cow::from(OsStr::new(DEFAULT_PATH))
            })
    }

    #[inline]
    fn get_override_env(&self) -> Result<bool> {
        self.get_bool("DOTENV_CONFIG_OVERRIDE".as_ref(), false)
    }

    #[inline]
    fn get_debug(&self) -> Result<bool> {
        self.get_bool("DOTENV_CONFIG_DEBUG".as_ref(), false)
    }

    fn get_bool(&self, key: &OsStr, default_value: bool) -> Result<bool> {
        if let Some(value) = self.get(key) {
            let value: &OsStr = &value;
            if value.is_empty() {
                return Ok(default_value);
            }

            let Some(value) = parse_bool(value) else {
                return Err(Error::illegal_option(key, value));
            };

            Ok(value)
        } else {
            Ok(default_value)
        }
    }
}

pub fn parse_bool(value: &OsStr) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}

/// Read/write environment, the export target after a successful parse.
pub trait Env: GetEnv {
    fn set(&mut self, key: &OsStr, value: &OsStr);
    fn as_get_env(&self) -> &dyn GetEnv;
}

/// Accessing the environment is unsafe (not thread safe), but the std::env::*
/// functions aren't marked as unsafe. This mutex doesn't really fix the issue
/// since it only applies to code accessing the environment through
/// [`SystemEnv`].
#[cfg(not(target_family = "windows"))]
static MUTEX: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, Copy)]
pub struct SystemEnv();

pub const SYSTEM_ENV: SystemEnv = SystemEnv();

impl Default for SystemEnv {
    #[inline]
    fn default() -> Self {
        Self()
    }
}

impl SystemEnv {
    #[inline]
    pub fn new() -> Self {
        Self()
    }
}

impl GetEnv for SystemEnv {
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        #[cfg(not(target_family = "windows"))]
        let _lock = MUTEX.lock();

        std::env::var_os(key).map(Cow::from)
    }
}

impl Env for SystemEnv {
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        #[cfg(not(target_family = "windows"))]
        let _lock = MUTEX.lock();

        std::env::set_var(key, value);
    }

    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        self
    }
}

/// An environment that contains nothing. Useful for parsing without any
/// ambient fallback in interpolation.
#[derive(Debug, Clone, Copy)]
pub struct EmptyEnv();

impl Default for EmptyEnv {
    #[inline]
    fn default() -> Self {
        Self()
    }
}

impl EmptyEnv {
    #[inline]
    pub fn new() -> Self {
        Self()
    }
}

impl GetEnv for EmptyEnv {
    #[inline]
    fn get<'a>(&'a self, _key: &OsStr) -> Option<Cow<'a, OsStr>> {
        None
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<OsString, OsString, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key).map(Cow::from)
    }
}

impl<BH: BuildHasher> Env for HashMap<OsString, OsString, BH> {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        self.insert(key.to_os_string(), value.to_os_string());
    }

    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        self
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<String, String, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key.to_string_lossy().as_ref()).map(|value| {
            let value: &OsStr = value.as_ref();
            Cow::from(value)
        })
    }
}

impl<BH: BuildHasher> Env for HashMap<String, String, BH> {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        self.insert(key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned());
    }

    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        self
    }
}
