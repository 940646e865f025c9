//! Template engine module
//!
//! Wraps minijinja with two loading strategies:
//! - debug mode: `AutoReloader` watching the template directory
//! - normal mode: one environment with a compiled-template cache, cleared on reload

use minijinja::{path_loader, Environment, Value};
use minijinja_autoreload::AutoReloader;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

pub enum TemplateEngine {
    AutoReload(AutoReloader),
    Cached(RwLock<Environment<'static>>),
}

impl TemplateEngine {
    /// Build the engine for the given template directory
    pub fn new(dir: impl Into<PathBuf>, auto_reload: bool) -> Self {
        let template_path = dir.into();
        if auto_reload {
            let reloader = AutoReloader::new(move |notifier| {
                let mut env = Environment::new();
                env.set_loader(path_loader(&template_path));
                notifier.set_fast_reload(true);
                notifier.watch_path(&template_path, true);
                Ok(env)
            });
            Self::AutoReload(reloader)
        } else {
            let mut env = Environment::new();
            env.set_loader(path_loader(&template_path));
            Self::Cached(RwLock::new(env))
        }
    }

    /// Render `name` with a serializable context
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, minijinja::Error> {
        let ctx = Value::from_serialize(context);
        match self {
            Self::AutoReload(reloader) => {
                let env = reloader.acquire_env()?;
                let tmpl = env.get_template(name)?;
                tmpl.render(ctx)
            }
            Self::Cached(env) => {
                let env = env.read().unwrap_or_else(PoisonError::into_inner);
                let tmpl = env.get_template(name)?;
                tmpl.render(ctx)
            }
        }
    }

    /// Drop compiled templates so the next render reads from disk.
    ///
    /// The auto-reloading engine already tracks file changes, so this only
    /// affects the cached engine.
    pub fn reload(&self) {
        if let Self::Cached(env) = self {
            env.write()
                .unwrap_or_else(PoisonError::into_inner)
                .clear_templates();
        }
    }
}
