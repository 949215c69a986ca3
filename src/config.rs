//! Configuration loading and the process-wide lookup tables.
//!
//! Two kinds of data live here:
//!
//! - The optional TOML configuration file (`skillcheck.toml`): per-document
//!   timeout, disabled rules, and extensions to the lookup tables. Use
//!   [`Config::load`] to read it.
//! - The built-in lookup tables: the deprecated-API map and the import
//!   allowlist manifest. Both are merged with any config extensions exactly
//!   once at load time and are read-only afterwards, so concurrent rule
//!   execution never needs a lock.
//!
//! ```rust,no_run
//! use skillcheck::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert!(config.is_rule_enabled("syntax"));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

/// Known-current import paths and the items importable from each.
///
/// Mirrors the documented module surface the guides are allowed to
/// reference. Absence from this manifest is only ever a warning: the
/// manifest may lag upstream releases.
const VALID_IMPORTS: &[(&str, &[&str])] = &[
    // Core
    (
        "langchain_core.prompts",
        &["ChatPromptTemplate", "PromptTemplate", "MessagesPlaceholder"],
    ),
    (
        "langchain_core.output_parsers",
        &["StrOutputParser", "JsonOutputParser", "PydanticOutputParser"],
    ),
    (
        "langchain_core.runnables",
        &[
            "RunnablePassthrough",
            "RunnableParallel",
            "RunnableLambda",
            "RunnableBranch",
            "Runnable",
        ],
    ),
    (
        "langchain_core.messages",
        &[
            "HumanMessage",
            "AIMessage",
            "SystemMessage",
            "ToolMessage",
            "AnyMessage",
        ],
    ),
    ("langchain_core.tools", &["tool", "Tool", "StructuredTool"]),
    (
        "langchain_core.vectorstores",
        &["InMemoryVectorStore", "VectorStore"],
    ),
    ("langchain_core.documents", &["Document"]),
    // Chat models
    (
        "langchain_openai",
        &["ChatOpenAI", "OpenAIEmbeddings", "OpenAI"],
    ),
    ("langchain_anthropic", &["ChatAnthropic"]),
    ("langchain_google_genai", &["ChatGoogleGenerativeAI"]),
    // Community
    (
        "langchain_community.document_loaders",
        &[
            "WebBaseLoader",
            "PyPDFLoader",
            "DirectoryLoader",
            "TextLoader",
            "CSVLoader",
        ],
    ),
    (
        "langchain_community.vectorstores",
        &["FAISS", "Chroma", "Pinecone", "Qdrant", "Weaviate", "PGVector"],
    ),
    ("langchain_community.embeddings", &["HuggingFaceEmbeddings"]),
    // Text splitters
    (
        "langchain_text_splitters",
        &[
            "RecursiveCharacterTextSplitter",
            "CharacterTextSplitter",
            "TokenTextSplitter",
        ],
    ),
    // LangGraph
    (
        "langgraph.graph",
        &["StateGraph", "START", "END", "MessagesState"],
    ),
    ("langgraph.graph.message", &["add_messages"]),
    (
        "langgraph.checkpoint.memory",
        &["InMemorySaver", "MemorySaver"],
    ),
    ("langgraph.checkpoint.sqlite", &["SqliteSaver"]),
    ("langgraph.checkpoint.postgres", &["PostgresSaver"]),
    ("langgraph.prebuilt", &["create_react_agent", "ToolNode"]),
    // LangChain agents (new style)
    ("langchain.agents", &["create_agent", "AgentExecutor"]),
    ("langchain.tools", &["tool", "Tool"]),
    ("langchain.chat_models", &["init_chat_model"]),
    (
        "langchain.messages",
        &[
            "HumanMessage",
            "AIMessage",
            "SystemMessage",
            "ToolMessage",
            "AnyMessage",
        ],
    ),
];

/// Deprecated module paths and their replacement guidance.
const DEPRECATED_MODULES: &[(&str, &str)] = &[
    ("langchain.prompts", "Use langchain_core.prompts instead"),
    ("langchain.schema", "Use langchain_core.messages instead"),
    (
        "langchain.llms",
        "Use langchain_openai or langchain_anthropic instead",
    ),
    (
        "langchain.embeddings",
        "Use langchain_openai.OpenAIEmbeddings or langchain_community.embeddings",
    ),
    (
        "langchain.vectorstores",
        "Use langchain_community.vectorstores or langchain_core.vectorstores",
    ),
    (
        "langchain.document_loaders",
        "Use langchain_community.document_loaders",
    ),
    ("langchain.text_splitter", "Use langchain_text_splitters"),
    (
        "langchain.chains",
        "Use LCEL (langchain_core.runnables) instead",
    ),
    ("langchain.memory", "Use LangGraph checkpointers instead"),
];

/// Main configuration for the validator.
///
/// Loaded from a TOML file (typically `skillcheck.toml`). All fields carry
/// sensible defaults so the config file can be omitted entirely.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline settings (per-document timeout).
    pub validator: ValidatorConfig,
    /// Rule on/off toggles.
    pub rules: RulesConfig,
    /// Extra deprecated module paths: path -> replacement guidance.
    pub deprecated: BTreeMap<String, String>,
    /// Extensions to the import allowlist manifest.
    pub imports: ImportsConfig,
}

/// Pipeline settings.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Per-document rule-execution budget in milliseconds. Exceeding it
    /// aborts that document's remaining rules and records a `timeout` error.
    pub timeout_ms: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig { timeout_ms: 10_000 }
    }
}

/// Rule toggles.
///
/// Every rule defaults to **enabled**. List registry names (e.g.
/// `"antipattern"`) under `disabled` to skip them during validation.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Registry names of rules to skip.
    pub disabled: Vec<String>,
}

/// Extensions to the import allowlist manifest.
///
/// ```toml
/// [imports.allowed]
/// "langgraph.types" = ["Command", "interrupt"]
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ImportsConfig {
    /// Extra manifest entries: module path -> importable items.
    pub allowed: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `skillcheck.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new("skillcheck.toml");
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Returns `true` if the named rule is enabled.
    ///
    /// Unknown rule names are considered enabled.
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        !self.rules.disabled.iter().any(|d| d == name)
    }

    /// Looks up replacement guidance for a deprecated module path.
    ///
    /// Matches when `module` equals a deprecated entry or lives underneath
    /// it (`langchain.schema.messages` matches `langchain.schema`). Config
    /// extensions are consulted after the built-in table.
    pub fn deprecated_replacement(&self, module: &str) -> Option<&str> {
        for (path, replacement) in DEPRECATED_MODULES {
            if module_matches(module, path) {
                return Some(replacement);
            }
        }
        self.deprecated
            .iter()
            .find(|(path, _)| module_matches(module, path))
            .map(|(_, replacement)| replacement.as_str())
    }

    /// Returns the importable items for a manifest module, or `None` when
    /// the module is not in the manifest.
    pub fn manifest_items(&self, module: &str) -> Option<Vec<&str>> {
        for (path, items) in VALID_IMPORTS {
            if *path == module {
                let mut all: Vec<&str> = items.to_vec();
                if let Some(extra) = self.imports.allowed.get(module) {
                    all.extend(extra.iter().map(String::as_str));
                }
                return Some(all);
            }
        }
        self.imports
            .allowed
            .get(module)
            .map(|items| items.iter().map(String::as_str).collect())
    }

    /// The namespace roots covered by the manifest (first dotted segment of
    /// every manifest module). Imports outside these roots are not checked.
    pub fn manifest_roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = VALID_IMPORTS
            .iter()
            .map(|(path, _)| root_of(path))
            .chain(self.imports.allowed.keys().map(|p| root_of(p)))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots
    }
}

fn root_of(module: &str) -> &str {
    module.split('.').next().unwrap_or(module)
}

/// `module` equals `path` or is a submodule of it.
fn module_matches(module: &str, path: &str) -> bool {
    module == path
        || module
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('.'))
}
