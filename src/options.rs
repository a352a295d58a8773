use std::{borrow::Cow, ffi::OsStr, io::Read, path::Path};

use crate::{env::{GetEnv, SystemEnv, SYSTEM_ENV}, Env, GatheredValues, Result, DEBUG_PREFIX};

#[derive(Debug, PartialEq, Clone)]
pub struct Options<P=&'static str>
where P: AsRef<Path> + Clone {
    /// Override existing environment variables on export.
    pub override_env: bool,

    /// Log IO and parser errors and skipped exports.
    pub debug: bool,

    pub path: P,
}

pub const DEFAULT_PATH: &str = ".env";
pub const DEFAULT_OVERRIDE_ENV: bool = false;
pub const DEFAULT_DEBUG: bool = false;

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Self {
            override_env: DEFAULT_OVERRIDE_ENV,
            debug: DEFAULT_DEBUG,
            path: DEFAULT_PATH,
        }
    }
}

impl<'a> Options<Cow<'a, OsStr>> {
    pub fn try_from(env: &'a impl GetEnv) -> Result<Self> {
        let override_env = env.get_override_env()?;
        let debug = env.get_debug()?;
        let path = env.get_config_path();

        Ok(Self { override_env, debug, path })
    }

    #[inline]
    pub fn try_from_env() -> Result<Self> {
        Self::try_from(&SYSTEM_ENV)
    }
}

impl<P> Options<P>
where P: AsRef<Path> + Clone {
    #[inline]
    pub fn with_path(path: P) -> Self {
        Self {
            override_env: DEFAULT_OVERRIDE_ENV,
            debug: DEFAULT_DEBUG,
            path,
        }
    }

    #[inline]
    pub fn config(&self) -> Result<()> {
        crate::config_with_options(&mut SystemEnv(), &SYSTEM_ENV, self)
    }

    /// Parses the configured file and exports into `env`, which doubles as
    /// the interpolation fallback for references the file itself does not
    /// define.
    pub fn config_env(&self, env: &mut impl Env) -> Result<()> {
        let values = crate::parse_file_with_options(env.as_get_env(), self)?;
        self.export(env, &values);
        Ok(())
    }

    #[inline]
    pub fn config_with_parent(&self, env: &mut impl Env, parent: &impl GetEnv) -> Result<()> {
        crate::config_with_options(env, parent, self)
    }

    #[inline]
    pub fn config_with_reader(&self, env: &mut impl Env, parent: &impl GetEnv, reader: &mut dyn Read) -> Result<()> {
        crate::config_with_reader(env, parent, reader, self)
    }

    #[inline]
    pub fn config_new(&self) -> Result<GatheredValues> {
        crate::parse_file_with_options(&SYSTEM_ENV, self)
    }

    #[inline]
    pub fn config_new_with_parent(&self, parent: &impl GetEnv) -> Result<GatheredValues> {
        crate::parse_file_with_options(parent, self)
    }

    #[inline]
    pub fn config_new_with_reader(&self, reader: &mut dyn Read) -> Result<GatheredValues> {
        crate::parse_reader_with_options(reader, &SYSTEM_ENV, self)
    }

    /// Exports a successfully gathered mapping into `env` in source order,
    /// honoring the override policy.
    pub(crate) fn export(&self, env: &mut dyn Env, values: &GatheredValues) {
        for (key, value) in values {
            self.set_var(env, key.as_ref(), value.as_ref());
        }
    }

    #[inline]
    pub(crate) fn set_var(&self, env: &mut dyn Env, key: &OsStr, value: &OsStr) {
        if self.override_env {
            env.set(key, value);
        } else if env.get(key).is_some() {
            if self.debug {
                eprintln!("{DEBUG_PREFIX}{key:?} is already defined and was NOT overwritten");
            }
        } else {
            env.set(key, value);
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Builder<P=&'static str>
where P: AsRef<Path> + Clone {
    options: Options<P>,
}

impl Default for Builder {
    #[inline]
    fn default() -> Self {
        Self { options: Options::default() }
    }
}

impl Builder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Builder<Cow<'a, OsStr>> {
    #[inline]
    pub fn try_from(env: &'a impl GetEnv) -> Result<Self> {
        let options = Options::try_from(env)?;
        Ok(Self { options })
    }

    #[inline]
    pub fn try_from_env() -> Result<Self> {
        let options = Options::try_from_env()?;
        Ok(Self { options })
    }
}

impl<P> Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    pub fn with_path(path: P) -> Self {
        Self {
            options: Options::with_path(path)
        }
    }

    #[inline]
    pub fn override_env(mut self, value: bool) -> Self {
        self.options.override_env = value;
        self
    }

    #[inline]
    pub fn debug(mut self, value: bool) -> Self {
        self.options.debug = value;
        self
    }

    pub fn path<NewP>(&self, value: NewP) -> Builder<NewP>
    where NewP: AsRef<Path> + Clone {
        Builder {
            options: Options {
                override_env: self.options.override_env,
                debug: self.options.debug,
                path: value,
            }
        }
    }

    #[inline]
    pub fn options(&self) -> &Options<P> {
        &self.options
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut Options<P> {
        &mut self.options
    }

    #[inline]
    pub fn into_options(self) -> Options<P> {
        self.options
    }

    #[inline]
    pub fn config(self) -> Result<Self> {
        self.options.config()?;
        Ok(self)
    }

    #[inline]
    pub fn config_env(self, env: &mut impl Env) -> Result<Self> {
        self.options.config_env(env)?;
        Ok(self)
    }

    #[inline]
    pub fn config_with_parent(self, env: &mut impl Env, parent: &impl GetEnv) -> Result<Self> {
        self.options.config_with_parent(env, parent)?;
        Ok(self)
    }

    #[inline]
    pub fn config_with_reader(self, env: &mut impl Env, parent: &impl GetEnv, reader: &mut dyn Read) -> Result<Self> {
        self.options.config_with_reader(env, parent, reader)?;
        Ok(self)
    }

    #[inline]
    pub fn config_new(&self) -> Result<GatheredValues> {
        self.options.config_new()
    }

    #[inline]
    pub fn config_new_with_parent(&self, parent: &impl GetEnv) -> Result<GatheredValues> {
        self.options.config_new_with_parent(parent)
    }

    #[inline]
    pub fn config_new_with_reader(&self, reader: &mut dyn Read) -> Result<GatheredValues> {
        self.options.config_new_with_reader(reader)
    }
}

impl<P> From<Options<P>> for Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(options: Options<P>) -> Self {
        Self {
            options
        }
    }
}

impl<P> From<&Options<P>> for Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(options: &Options<P>) -> Self {
        Self {
            options: options.clone()
        }
    }
}

impl<P> From<Builder<P>> for Options<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(value: Builder<P>) -> Self {
        value.into_options()
    }
}
