// ============================================================================
// CRM Core - Module Registry
// File: crates/crm-core/src/domain/module.rs
// Description: Back-office modules and the module-key normalization rule
// ============================================================================

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const DASHBOARD: &str = "dashboard";
pub const LEADS: &str = "leads";
pub const PRODUCTS: &str = "produtos";
pub const STORES: &str = "lojas";
pub const ORDERS: &str = "pedidos";
pub const SUBSCRIPTIONS: &str = "assinaturas";
pub const PAYMENTS: &str = "pagamentos";
pub const USERS: &str = "usuarios";
pub const GROUPS: &str = "grupos";
pub const FRANCHISES: &str = "franquias";
pub const SETTINGS: &str = "configuracoes";

/// Derives the module key used to join tenant enablement and group grants.
///
/// Diacritics are stripped, letters lowercased, and every run of whitespace,
/// `-` or `_` becomes a single `_`. Any other punctuation is dropped.
/// `normalize_module_key(normalize_module_key(x)) == normalize_module_key(x)`.
pub fn normalize_module_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = !key.is_empty();
        } else if c.is_alphanumeric() {
            if pending_separator {
                key.push('_');
                pending_separator = false;
            }
            key.extend(c.to_lowercase());
        }
    }

    key
}

/// A back-office capability that can be licensed and granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub key: String,
    pub name: String,
    pub category: String,
}

impl Module {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            key: normalize_module_key(name),
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

/// Catalogue of known modules, keyed by normalized key.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new(vec![
            Module::new("Dashboard", "Visão Geral"),
            Module::new("Leads", "Comercial"),
            Module::new("Pedidos", "Comercial"),
            Module::new("Produtos", "Catálogo"),
            Module::new("Lojas", "Catálogo"),
            Module::new("Assinaturas", "Financeiro"),
            Module::new("Pagamentos", "Financeiro"),
            Module::new("Usuários", "Administração"),
            Module::new("Grupos", "Administração"),
            Module::new("Franquias", "Administração"),
            Module::new("Configurações", "Administração"),
        ])
    }
}

impl ModuleRegistry {
    /// Later duplicates of an already registered key are ignored.
    pub fn new(modules: Vec<Module>) -> Self {
        let mut unique: Vec<Module> = Vec::with_capacity(modules.len());
        for module in modules {
            if !module.key.is_empty() && !unique.iter().any(|m| m.key == module.key) {
                unique.push(module);
            }
        }
        Self { modules: unique }
    }

    pub fn get(&self, key: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.key == key)
    }

    /// Normalizes a key or display name and looks it up.
    pub fn resolve(&self, input: &str) -> Option<&Module> {
        self.get(&normalize_module_key(input))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
