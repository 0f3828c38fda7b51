//! Bundler entry wiring
//!
//! Describes which entries the client and server bundles are built from,
//! which modules go into the shared vendor chunk and which plugins the
//! client build needs. The plan is handed to the bundler as JSON; the page
//! document uses it to know which manifest entries to link.

use serde::{Deserialize, Serialize};

/// Plugin emitting the client manifest consumed by the SSR renderer
pub const VUE_SSR_CLIENT_PLUGIN: &str = "vue-ssr-client";

/// Name of the shared vendor chunk
pub const VENDOR_CHUNK: &str = "vendor";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub client_entries: Vec<String>,
    pub ssr_entries: Vec<String>,
    pub vendor: Vec<String>,
    pub client_plugins: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

impl BuildPlan {
    /// Empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan used by the SSR pages: `client` entry, `server` SSR entry and a
    /// vendor chunk with the framework modules
    pub fn standard() -> Self {
        let mut plan = Self::new();
        plan.add_entry("client")
            .add_ssr("server")
            .add_client_plugin(VUE_SSR_CLIENT_PLUGIN)
            .add_vendor(["vue", "vue-router", "vuex"]);
        plan
    }

    pub fn add_entry(&mut self, name: &str) -> &mut Self {
        push_unique(&mut self.client_entries, name);
        self
    }

    pub fn add_ssr(&mut self, name: &str) -> &mut Self {
        push_unique(&mut self.ssr_entries, name);
        self
    }

    pub fn add_vendor<'a>(&mut self, modules: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for module in modules {
            push_unique(&mut self.vendor, module);
        }
        self
    }

    pub fn add_client_plugin(&mut self, name: &str) -> &mut Self {
        push_unique(&mut self.client_plugins, name);
        self
    }

    /// Manifest keys of the scripts a page loads, vendor chunk first
    pub fn script_entries(&self) -> Vec<String> {
        let vendor = (!self.vendor.is_empty()).then(|| format!("{VENDOR_CHUNK}.js"));
        vendor
            .into_iter()
            .chain(self.client_entries.iter().map(|e| format!("{e}.js")))
            .collect()
    }

    /// Manifest keys of the extracted stylesheets
    pub fn style_entries(&self) -> Vec<String> {
        self.client_entries.iter().map(|e| format!("{e}.css")).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
