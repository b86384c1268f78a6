//! IR Builder
//!
//! Walks a decoded configuration document top-down and produces the [`Ir`]:
//!
//! ```text
//! root   wolfes_version, platform, lang, apps[]
//! app    namespace, domain_id?, protocol_type, scheduler_config?, nodes[], modules[]?
//! node   classname, qos_config?, timers[], topic_pubs[], topic_subs[],
//!        service_servers[], service_clients[]
//! leaf   identifier?, <kind fields>, msg_src?, <function>?
//! ```
//!
//! Required fields must be present with the right type. Optional scalar
//! fields fall back to index-derived defaults and leave a warning in the
//! [`Diagnostics`] sink. Every node class name, entity id and function name
//! is registered in the app's [`IdentifierRegistry`]; the first violation
//! aborts the build, no partial IR is returned.

use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::diagnostics::Diagnostics;
use crate::error::{CompileError, Result};
use crate::ident::{is_valid_identifier, IdentifierRegistry};
use crate::ir::{
    App, CodeEnum, Ir, Lang, MessageRef, Module, MsgType, Node, Platform, ProtocolType,
    ServiceEndpoint, Timer, TimerType, TopicEndpoint,
};
use crate::location::Location;
use crate::reader::expand_home;
use crate::version::parse_version;

// =============================================================================
// Entity kinds
// =============================================================================

/// Leaf entity kinds of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Timer,
    TopicPub,
    TopicSub,
    ServiceServer,
    ServiceClient,
}

impl EntityKind {
    /// Document key of the list holding this kind
    pub fn list_key(self) -> &'static str {
        match self {
            Self::Timer => "timers",
            Self::TopicPub => "topic_pubs",
            Self::TopicSub => "topic_subs",
            Self::ServiceServer => "service_servers",
            Self::ServiceClient => "service_clients",
        }
    }

    /// Document key of the function name field
    pub fn function_key(self) -> &'static str {
        match self {
            Self::Timer | Self::TopicSub => "cb_function",
            Self::TopicPub => "pub_function",
            Self::ServiceServer => "res_function",
            Self::ServiceClient => "req_function",
        }
    }

    /// Generated id for the entity at `index`, e.g. `_topic_sub_2`
    pub fn default_id(self, index: usize) -> String {
        let stem = match self {
            Self::Timer => "timer",
            Self::TopicPub => "topic_pub",
            Self::TopicSub => "topic_sub",
            Self::ServiceServer => "service_server",
            Self::ServiceClient => "service_client",
        };
        format!("_{}_{}", stem, index)
    }

    /// Generated function name for the entity at `index`, e.g. `__Timer0Cb`
    pub fn default_function(self, index: usize) -> String {
        let (stem, suffix) = match self {
            Self::Timer => ("Timer", "Cb"),
            Self::TopicPub => ("TopicPub", "Pub"),
            Self::TopicSub => ("TopicSub", "Cb"),
            Self::ServiceServer => ("ServiceServer", "Res"),
            Self::ServiceClient => ("ServiceClient", "Req"),
        };
        format!("__{}{}{}", stem, index, suffix)
    }
}

// =============================================================================
// Field access
// =============================================================================

/// Typed view of one JSON object in the document
struct Fields<'v> {
    map: &'v Map<String, Value>,
    location: Location,
}

impl<'v> Fields<'v> {
    fn object(value: &'v Value, location: Location) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, location }),
            _ => Err(CompileError::InvalidFieldType {
                location,
                expected: "an object",
            }),
        }
    }

    fn at(&self, key: &str) -> Location {
        self.location.field(key)
    }

    /// Explicit `null` counts as absent
    fn get(&self, key: &str) -> Option<&'v Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn require(&self, key: &str) -> Result<&'v Value> {
        self.get(key).ok_or_else(|| CompileError::MissingRequiredField {
            location: self.at(key),
        })
    }

    fn wrong_type(&self, key: &str, expected: &'static str) -> CompileError {
        CompileError::InvalidFieldType {
            location: self.at(key),
            expected,
        }
    }

    fn as_str(&self, key: &str, value: &'v Value) -> Result<&'v str> {
        value.as_str().ok_or_else(|| self.wrong_type(key, "a string"))
    }

    fn required_str(&self, key: &str) -> Result<&'v str> {
        let value = self.require(key)?;
        self.as_str(key, value)
    }

    fn optional_str(&self, key: &str) -> Result<Option<&'v str>> {
        self.get(key).map(|v| self.as_str(key, v)).transpose()
    }

    fn required_int(&self, key: &str) -> Result<i64> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| self.wrong_type(key, "an integer"))
    }

    fn required_u64(&self, key: &str) -> Result<u64> {
        self.require(key)?
            .as_u64()
            .ok_or_else(|| self.wrong_type(key, "a non-negative integer"))
    }

    fn optional_u32(&self, key: &str) -> Result<Option<u32>> {
        self.get(key)
            .map(|v| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| self.wrong_type(key, "a non-negative 32-bit integer"))
            })
            .transpose()
    }

    fn required_enum<T: CodeEnum>(&self, key: &str) -> Result<T> {
        let code = self.required_int(key)?;
        T::from_code(code).ok_or_else(|| CompileError::UnsupportedEnumValue {
            location: self.at(key),
            kind: T::KIND,
            code,
        })
    }

    fn required_array(&self, key: &str) -> Result<&'v [Value]> {
        self.require(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(key, "an array"))
    }

    /// Objects of one entity list with their index in the list
    fn entities(&self, kind: EntityKind) -> Result<Vec<(usize, Fields<'v>)>> {
        self.optional_array(kind.list_key())?
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let location = self.location.element(kind.list_key(), i);
                Ok((i, Fields::object(value, location)?))
            })
            .collect()
    }

    /// Absent lists are empty
    fn optional_array(&self, key: &str) -> Result<&'v [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(v) => v
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| self.wrong_type(key, "an array")),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds an [`Ir`] from a decoded configuration document
pub struct IrBuilder<'d> {
    diagnostics: &'d mut Diagnostics,
    /// Directory relative referenced files are resolved against
    base_dir: Option<PathBuf>,
}

impl<'d> IrBuilder<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            diagnostics,
            base_dir: None,
        }
    }

    /// Resolve relative `scheduler_config`, `qos_config` and `msg_src`
    /// paths against `dir` instead of the working directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Build the IR for a whole document. The first error in any app aborts
    /// the run.
    pub fn build(&mut self, document: &Value) -> Result<Ir> {
        let root = Fields::object(document, Location::root())?;

        let version_str = root.required_str("wolfes_version")?;
        let version = parse_version(version_str, &root.at("wolfes_version"), self.diagnostics)?;
        let platform = root.required_enum::<Platform>("platform")?;
        let lang = root.required_enum::<Lang>("lang")?;

        let mut apps = Vec::new();
        for (i, value) in root.required_array("apps")?.iter().enumerate() {
            apps.push(self.build_app(value, root.location.element("apps", i))?);
        }

        tracing::debug!(
            "built IR: version {}, platform {}, lang {}, {} app(s)",
            version,
            platform,
            lang,
            apps.len()
        );
        Ok(Ir {
            platform,
            lang,
            version,
            apps,
            custom_msgs: Vec::new(),
        })
    }

    fn build_app(&mut self, value: &Value, location: Location) -> Result<App> {
        let fields = Fields::object(value, location)?;
        let mut registry = IdentifierRegistry::new();

        let namespace = fields.required_str("namespace")?;
        if !is_valid_identifier(namespace) {
            return Err(CompileError::InvalidIdentifier {
                location: fields.at("namespace"),
                identifier: namespace.to_string(),
            });
        }

        let domain_id = match fields.optional_u32("domain_id")? {
            Some(id) => id,
            None => {
                self.diagnostics.defaulted(fields.at("domain_id"), 0);
                0
            }
        };
        let protocol_type = fields.required_enum::<ProtocolType>("protocol_type")?;
        let scheduler_config = self.referenced_file(&fields, "scheduler_config")?;

        let mut nodes = Vec::new();
        for (i, value) in fields.required_array("nodes")?.iter().enumerate() {
            let location = fields.location.element("nodes", i);
            nodes.push(self.build_node(value, location, &mut registry)?);
        }

        let mut modules = Vec::new();
        for (i, value) in fields.optional_array("modules")?.iter().enumerate() {
            let location = fields.location.element("modules", i);
            Fields::object(value, location.clone())?;
            self.diagnostics.not_yet_implemented(location, "module");
            modules.push(Module::placeholder());
        }

        registry.check_duplicates(&fields.location)?;

        tracing::debug!(
            "app {} ({}): {} node(s), {} identifier(s)",
            namespace,
            fields.location,
            nodes.len(),
            registry.len()
        );
        Ok(App {
            namespace: namespace.to_string(),
            domain_id,
            protocol_type,
            scheduler_config,
            nodes,
            modules,
            identifiers: registry.into_identifiers(),
        })
    }

    fn build_node(
        &mut self,
        value: &Value,
        location: Location,
        registry: &mut IdentifierRegistry,
    ) -> Result<Node> {
        let fields = Fields::object(value, location)?;

        let classname = fields.required_str("classname")?;
        registry.register(classname, &fields.at("classname"))?;

        let mut node = Node::new(classname);
        node.qos_config = self.referenced_file(&fields, "qos_config")?;

        for (i, entity) in fields.entities(EntityKind::Timer)? {
            node.timers.push(self.build_timer(entity, i, registry)?);
        }
        for (i, entity) in fields.entities(EntityKind::TopicPub)? {
            node.topic_pubs.push(self.build_topic(entity, EntityKind::TopicPub, i, registry)?);
        }
        for (i, entity) in fields.entities(EntityKind::TopicSub)? {
            node.topic_subs.push(self.build_topic(entity, EntityKind::TopicSub, i, registry)?);
        }
        for (i, entity) in fields.entities(EntityKind::ServiceServer)? {
            node.service_servers
                .push(self.build_service(entity, EntityKind::ServiceServer, i, registry)?);
        }
        for (i, entity) in fields.entities(EntityKind::ServiceClient)? {
            node.service_clients
                .push(self.build_service(entity, EntityKind::ServiceClient, i, registry)?);
        }

        for (key, feature) in [
            ("action_servers", "action servers"),
            ("action_clients", "action clients"),
        ] {
            if !fields.optional_array(key)?.is_empty() {
                return Err(CompileError::NotSupported {
                    location: fields.at(key),
                    feature,
                });
            }
        }

        Ok(node)
    }

    fn build_timer(
        &mut self,
        fields: Fields<'_>,
        index: usize,
        registry: &mut IdentifierRegistry,
    ) -> Result<Timer> {
        let kind = EntityKind::Timer;
        let id = self.identifier(&fields, "identifier", kind.default_id(index), registry)?;
        let timer_type = fields.required_enum::<TimerType>("type")?;
        let period_ms = fields.required_u64("period")?;
        let callback = self.identifier(
            &fields,
            kind.function_key(),
            kind.default_function(index),
            registry,
        )?;

        Ok(Timer {
            id,
            timer_type,
            period_ms,
            callback,
        })
    }

    fn build_topic(
        &mut self,
        fields: Fields<'_>,
        kind: EntityKind,
        index: usize,
        registry: &mut IdentifierRegistry,
    ) -> Result<TopicEndpoint> {
        let id = self.identifier(&fields, "identifier", kind.default_id(index), registry)?;
        let topic_name = fields.required_str("topic_name")?.to_string();
        let message = self.message(&fields)?;
        let function = self.identifier(
            &fields,
            kind.function_key(),
            kind.default_function(index),
            registry,
        )?;

        Ok(TopicEndpoint {
            id,
            topic_name,
            message,
            function,
        })
    }

    fn build_service(
        &mut self,
        fields: Fields<'_>,
        kind: EntityKind,
        index: usize,
        registry: &mut IdentifierRegistry,
    ) -> Result<ServiceEndpoint> {
        let id = self.identifier(&fields, "identifier", kind.default_id(index), registry)?;
        let service_name = fields.required_str("service_name")?.to_string();
        let message = self.message(&fields)?;
        let function = self.identifier(
            &fields,
            kind.function_key(),
            kind.default_function(index),
            registry,
        )?;

        Ok(ServiceEndpoint {
            id,
            service_name,
            message,
            function,
        })
    }

    /// `message`, `msg_type` and `msg_src` of an endpoint
    fn message(&mut self, fields: &Fields<'_>) -> Result<MessageRef> {
        let name = fields.required_str("message")?.to_string();
        let msg_type = fields.required_enum::<MsgType>("msg_type")?;
        let src = self.referenced_file(fields, "msg_src")?;
        Ok(MessageRef {
            msg_type,
            name,
            src,
        })
    }

    /// Optional identifier field: declared value or `default`, registered
    /// either way
    fn identifier(
        &mut self,
        fields: &Fields<'_>,
        key: &str,
        default: String,
        registry: &mut IdentifierRegistry,
    ) -> Result<String> {
        let location = fields.at(key);
        let identifier = match fields.optional_str(key)? {
            Some(declared) => declared.to_string(),
            None => {
                self.diagnostics.defaulted(location.clone(), &default);
                default
            }
        };
        registry.register(&identifier, &location)?;
        Ok(identifier)
    }

    /// Optional path field. The value is recorded verbatim; the file it names
    /// must exist.
    fn referenced_file(&mut self, fields: &Fields<'_>, key: &str) -> Result<Option<String>> {
        let location = fields.at(key);
        let Some(raw) = fields.optional_str(key)? else {
            self.diagnostics.omitted(location);
            return Ok(None);
        };

        let path = self.resolve(raw)?;
        if raw.is_empty() || !path.exists() {
            return Err(CompileError::ReferencedFileNotFound { location, path });
        }
        Ok(Some(raw.to_string()))
    }

    fn resolve(&self, raw: &str) -> Result<PathBuf> {
        let path = expand_home(raw)?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Ok(base.join(path)),
            _ => Ok(path),
        }
    }
}
