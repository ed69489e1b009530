//! Installed grammars and post-tokenize hooks.
//!
//! The registry is the one piece of shared state in the engine. Grammars
//! are stored behind `Arc` and installed by swapping the whole `Arc` under
//! a write lock: readers either see the old rule set or the new one, never
//! a half-edited one. Tokenizing happens on a cloned `Arc`, outside the
//! lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::grammar::Grammar;
use crate::languages;
use crate::token::Node;
use crate::tokenizer::tokenize;
use crate::EngineError;

/// State handed to after-tokenize hooks.
#[derive(Debug)]
pub struct HookEnv<'a> {
    pub language: &'a str,
    pub code: &'a str,
    pub tokens: Vec<Node>,
}

/// A pass that runs over every freshly tokenized tree.
///
/// Hooks see trees for every language; a hook meant for one language must
/// check `env.language` and leave other trees alone.
pub trait AfterTokenize: Send + Sync {
    fn after_tokenize(&self, env: &mut HookEnv<'_>);
}

/// Grammars by language id, plus the hooks run after tokenizing.
#[derive(Default)]
pub struct GrammarRegistry {
    grammars: RwLock<HashMap<String, Arc<Grammar>>>,
    hooks: RwLock<Vec<Arc<dyn AfterTokenize>>>,
}

impl GrammarRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `markup` and `go` base grammars installed.
    pub fn with_base_grammars() -> Result<Self, EngineError> {
        let registry = Self::new();
        registry.register(languages::MARKUP, languages::markup()?);
        registry.register(languages::GO, languages::go()?);
        Ok(registry)
    }

    /// Install `grammar` under `language`, replacing any previous one.
    pub fn register(&self, language: &str, grammar: Grammar) -> Arc<Grammar> {
        self.install(language, grammar, None)
    }

    /// Like [`register`](Self::register), and adds `hook` if `language` was
    /// not registered before. The check and both inserts happen under the
    /// grammar write lock, so concurrent callers add the hook once.
    pub fn register_with_hook(
        &self,
        language: &str,
        grammar: Grammar,
        hook: Arc<dyn AfterTokenize>,
    ) -> Arc<Grammar> {
        self.install(language, grammar, Some(hook))
    }

    fn install(
        &self,
        language: &str,
        grammar: Grammar,
        hook: Option<Arc<dyn AfterTokenize>>,
    ) -> Arc<Grammar> {
        let grammar = Arc::new(grammar);
        let mut grammars = self.grammars.write().unwrap_or_else(PoisonError::into_inner);
        let previous = grammars.insert(language.to_string(), Arc::clone(&grammar));
        let hook = hook.filter(|_| previous.is_none());
        let hooked = hook.is_some();
        if let Some(hook) = hook {
            self.add_hook(hook);
        }
        drop(grammars);
        debug!(
            "{} grammar '{language}' ({} rules{})",
            if previous.is_some() { "replaced" } else { "registered" },
            grammar.rules().len(),
            if hooked { ", hook added" } else { "" }
        );
        grammar
    }

    pub fn get(&self, language: &str) -> Option<Arc<Grammar>> {
        self.grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(language)
            .cloned()
    }

    pub fn contains(&self, language: &str) -> bool {
        self.get(language).is_some()
    }

    /// Installed language ids, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn add_hook(&self, hook: Arc<dyn AfterTokenize>) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Tokenize `code` with the grammar for `language`, then run every hook.
    pub fn highlight(&self, language: &str, code: &str) -> Result<Vec<Node>, EngineError> {
        let grammar = self
            .get(language)
            .ok_or_else(|| EngineError::UnknownLanguage(language.to_string()))?;
        let mut env = HookEnv {
            language,
            code,
            tokens: tokenize(code, &grammar),
        };
        let hooks: Vec<Arc<dyn AfterTokenize>> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook.after_tokenize(&mut env);
        }
        Ok(env.tokens)
    }
}

impl std::fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("languages", &self.languages())
            .field("hooks", &self.hook_count())
            .finish()
    }
}
