//! Structural schema checks
//!
//! Understands the subset of XML Schema that graph and operations schemas
//! use:
//! - global and local element declarations, `ref` to global elements
//! - inline and named complex types, named model groups
//! - `sequence`, `choice`, `all` and `any` with `minOccurs`/`maxOccurs`
//! - attribute declarations with `use="required"`
//!
//! Each declaration carries its own content model, so a child is checked
//! against the declaration its parent allows at that position. The root has
//! to match a global element. Extensions, attribute groups and
//! `anyAttribute` make an element accept any attribute; `complexContent`
//! derivations accept any children.
//!
//! Particles are matched greedily, which is exact for schemas obeying the
//! unique particle attribution rule.
//!
//! Reports are informational; nothing in the replay depends on them.

use super::element::Element;
use super::DocumentResult;
use std::collections::{HashMap, HashSet};
use std::fmt;

type DeclId = usize;
type TypeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occurs {
    min: u32,
    /// `None` is unbounded
    max: Option<u32>,
}

impl Occurs {
    fn of(element: &Element) -> Self {
        let min = element
            .attribute("minOccurs")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1);
        let max = match element.attribute("maxOccurs").map(str::trim) {
            Some("unbounded") => None,
            Some(v) => Some(v.parse().unwrap_or(1)),
            None => Some(1),
        };
        Occurs { min, max }
    }

    /// Whether one more occurrence is allowed after `count`
    fn allows(&self, count: u32) -> bool {
        self.max.map_or(true, |max| count < max)
    }
}

#[derive(Debug, Clone)]
enum Particle {
    Element { decl: DeclId, occurs: Occurs },
    Sequence { items: Vec<Particle>, occurs: Occurs },
    Choice { items: Vec<Particle>, occurs: Occurs },
    /// Each item at most once, any order
    All { items: Vec<Particle>, occurs: Occurs },
    /// Wildcard; matched children are not checked further
    Any { occurs: Occurs },
}

impl Particle {
    fn occurs(&self) -> Occurs {
        match self {
            Particle::Element { occurs, .. }
            | Particle::Sequence { occurs, .. }
            | Particle::Choice { occurs, .. }
            | Particle::All { occurs, .. }
            | Particle::Any { occurs } => *occurs,
        }
    }
}

#[derive(Debug, Clone, Default)]
enum Content {
    /// No child elements
    #[default]
    Empty,
    Model(Particle),
    /// Children are not checked
    Any,
}

/// Attributes allowed on one complex type
#[derive(Debug, Clone, Default)]
struct AttributeRule {
    declared: HashSet<String>,
    required: Vec<String>,
    /// Accepts attributes that were not declared
    open: bool,
}

impl AttributeRule {
    fn add(&mut self, item: &Element) {
        match item.name.as_str() {
            "attribute" => match item.attribute("name") {
                Some(name) => {
                    self.declared.insert(name.to_string());
                    if item.attribute("use") == Some("required") {
                        self.required.push(name.to_string());
                    }
                }
                None => self.open = true,
            },
            "attributeGroup" | "anyAttribute" => self.open = true,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ComplexType {
    attributes: AttributeRule,
    content: Content,
}

#[derive(Debug, Clone, Copy)]
enum ElementType {
    Complex(TypeId),
    /// Text only: no attributes, no children
    Simple,
    /// `xs:anyType` or no type at all
    AnyType,
}

#[derive(Debug, Clone)]
struct Declaration {
    name: String,
    ty: ElementType,
}

/// A problem found while checking a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    /// The root element is not a global declaration
    UndeclaredRoot { element: String },
    /// A child the parent's content model does not allow at its position
    UnexpectedElement { element: String, parent: String },
    /// The parent's content model needs a child that is not there
    MissingElement { element: String, parent: String },
    UndeclaredAttribute { element: String, attribute: String },
    MissingAttribute { element: String, attribute: String },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::UndeclaredRoot { element } => {
                write!(f, "root element <{}> is not declared", element)
            }
            SchemaIssue::UnexpectedElement { element, parent } => {
                write!(f, "<{}> is not allowed here inside <{}>", element, parent)
            }
            SchemaIssue::MissingElement { element, parent } => {
                write!(f, "<{}> is missing expected child <{}>", parent, element)
            }
            SchemaIssue::UndeclaredAttribute { element, attribute } => {
                write!(f, "attribute '{}' is not declared on <{}>", attribute, element)
            }
            SchemaIssue::MissingAttribute { element, attribute } => {
                write!(f, "<{}> is missing required attribute '{}'", element, attribute)
            }
        }
    }
}

/// Result of checking a document against a schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Element declarations and their content models read from an XSD document
#[derive(Debug, Clone, Default)]
pub struct Schema {
    declarations: Vec<Declaration>,
    types: Vec<ComplexType>,
    globals: HashMap<String, DeclId>,
}

impl Schema {
    pub fn parse(source: &str) -> DocumentResult<Self> {
        let root = Element::parse(source)?;
        Ok(Self::from_element(&root))
    }

    pub fn from_element(root: &Element) -> Self {
        let mut builder = Builder::default();
        for child in &root.children {
            if let Some(name) = child.attribute("name") {
                match child.name.as_str() {
                    "complexType" => {
                        builder.named_types.insert(name, child);
                    }
                    "group" => {
                        builder.named_groups.insert(name, child);
                    }
                    _ => {}
                }
            }
        }

        // Register every global first so `ref` resolves regardless of order
        let mut globals = Vec::new();
        for child in root.children.iter().filter(|c| c.name == "element") {
            if let Some(name) = child.attribute("name") {
                let id = builder.declare(name);
                builder.schema.globals.insert(name.to_string(), id);
                globals.push((child, id));
            }
        }
        for (element, id) in globals {
            let ty = builder.element_type(element);
            builder.schema.declarations[id].ty = ty;
        }
        builder.schema
    }

    /// Check if an element name is declared anywhere in the schema
    pub fn declares(&self, element: &str) -> bool {
        self.declarations.iter().any(|d| d.name == element)
    }

    /// Check a document against the declarations
    pub fn validate(&self, document: &Element) -> SchemaReport {
        let mut report = SchemaReport::default();
        match self.globals.get(&document.name) {
            Some(&decl) => self.check(decl, document, &mut report),
            None => report.issues.push(SchemaIssue::UndeclaredRoot {
                element: document.name.clone(),
            }),
        }
        report
    }

    fn check(&self, decl: DeclId, element: &Element, report: &mut SchemaReport) {
        let ty = match self.declarations[decl].ty {
            ElementType::AnyType => return,
            ElementType::Simple => {
                for key in element.attributes.keys().filter(|k| !k.contains(':')) {
                    report.issues.push(SchemaIssue::UndeclaredAttribute {
                        element: element.name.clone(),
                        attribute: key.clone(),
                    });
                }
                for child in &element.children {
                    report.issues.push(unexpected(child, element));
                }
                return;
            }
            ElementType::Complex(id) => &self.types[id],
        };

        check_attributes(&ty.attributes, element, report);

        match &ty.content {
            Content::Any => {}
            Content::Empty => {
                for child in &element.children {
                    report.issues.push(unexpected(child, element));
                }
            }
            Content::Model(particle) => {
                let mut matcher = Matcher {
                    schema: self,
                    parent: element,
                    assigned: vec![None; element.children.len()],
                };
                match matcher.matches(particle, 0) {
                    Ok(end) => {
                        if let Some(extra) = element.children.get(end) {
                            report.issues.push(unexpected(extra, element));
                        }
                    }
                    Err(issue) => report.issues.push(issue),
                }
                for (child, decl) in element.children.iter().zip(matcher.assigned) {
                    if let Some(decl) = decl {
                        self.check(decl, child, report);
                    }
                }
            }
        }
    }

    fn name_of(&self, decl: DeclId) -> &str {
        &self.declarations[decl].name
    }

    /// Whether the particle can begin with an element of this name
    fn starts_with(&self, particle: &Particle, name: &str) -> bool {
        match particle {
            Particle::Element { decl, .. } => self.name_of(*decl) == name,
            Particle::Any { .. } => true,
            Particle::Sequence { items, .. } => {
                for item in items {
                    if self.starts_with(item, name) {
                        return true;
                    }
                    if !self.nullable(item) {
                        return false;
                    }
                }
                false
            }
            Particle::Choice { items, .. } | Particle::All { items, .. } => {
                items.iter().any(|item| self.starts_with(item, name))
            }
        }
    }

    /// Whether the particle may match no elements at all
    fn nullable(&self, particle: &Particle) -> bool {
        match particle {
            Particle::Element { occurs, .. } | Particle::Any { occurs } => occurs.min == 0,
            Particle::Sequence { items, occurs } | Particle::All { items, occurs } => {
                occurs.min == 0 || items.iter().all(|item| self.nullable(item))
            }
            Particle::Choice { items, occurs } => {
                occurs.min == 0 || items.iter().any(|item| self.nullable(item))
            }
        }
    }

    /// A name to report when the particle is required but absent
    fn expected_name(&self, particle: &Particle) -> String {
        match particle {
            Particle::Element { decl, .. } => self.name_of(*decl).to_string(),
            Particle::Any { .. } => "any element".to_string(),
            Particle::Sequence { items, .. }
            | Particle::Choice { items, .. }
            | Particle::All { items, .. } => items
                .iter()
                .find(|item| !self.nullable(item))
                .or_else(|| items.first())
                .map(|item| self.expected_name(item))
                .unwrap_or_default(),
        }
    }
}

fn check_attributes(rule: &AttributeRule, element: &Element, report: &mut SchemaReport) {
    for required in &rule.required {
        if element.attribute(required).is_none() {
            report.issues.push(SchemaIssue::MissingAttribute {
                element: element.name.clone(),
                attribute: required.clone(),
            });
        }
    }
    if !rule.open {
        // Prefixed attributes (xsi:schemaLocation, ...) belong to other vocabularies
        for key in element.attributes.keys().filter(|k| !k.contains(':')) {
            if !rule.declared.contains(key) {
                report.issues.push(SchemaIssue::UndeclaredAttribute {
                    element: element.name.clone(),
                    attribute: key.clone(),
                });
            }
        }
    }
}

fn unexpected(element: &Element, parent: &Element) -> SchemaIssue {
    SchemaIssue::UnexpectedElement {
        element: element.name.clone(),
        parent: parent.name.clone(),
    }
}

fn local_part(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

fn is_particle(element: &Element) -> bool {
    matches!(
        element.name.as_str(),
        "element" | "sequence" | "choice" | "all" | "group" | "any"
    )
}

/// Walks the children of one element against its content model, recording
/// which declaration each matched child falls under
struct Matcher<'s, 'd> {
    schema: &'s Schema,
    parent: &'d Element,
    assigned: Vec<Option<DeclId>>,
}

impl Matcher<'_, '_> {
    fn name_at(&self, position: usize) -> Option<&str> {
        self.parent.children.get(position).map(|c| c.name.as_str())
    }

    fn missing(&self, particle: &Particle) -> SchemaIssue {
        SchemaIssue::MissingElement {
            element: self.schema.expected_name(particle),
            parent: self.parent.name.clone(),
        }
    }

    /// Match as much as possible from `position`, returning the new position
    fn matches(&mut self, particle: &Particle, mut position: usize) -> Result<usize, SchemaIssue> {
        let occurs = particle.occurs();
        let mut count = 0;

        match particle {
            Particle::Element { decl, .. } => {
                while occurs.allows(count) && self.name_at(position) == Some(self.schema.name_of(*decl)) {
                    self.assigned[position] = Some(*decl);
                    position += 1;
                    count += 1;
                }
                if count < occurs.min {
                    return Err(self.missing(particle));
                }
            }
            Particle::Any { .. } => {
                while occurs.allows(count) && position < self.parent.children.len() {
                    position += 1;
                    count += 1;
                }
                if count < occurs.min {
                    return Err(self.missing(particle));
                }
            }
            Particle::Sequence { items, .. } => {
                while occurs.allows(count) {
                    if count >= occurs.min {
                        match self.name_at(position) {
                            Some(name) if self.schema.starts_with(particle, name) => {}
                            _ => break,
                        }
                    }
                    let start = position;
                    for item in items {
                        position = self.matches(item, position)?;
                    }
                    count += 1;
                    if position == start {
                        break;
                    }
                }
            }
            Particle::Choice { items, .. } => {
                while occurs.allows(count) {
                    let chosen = self
                        .name_at(position)
                        .and_then(|name| items.iter().find(|item| self.schema.starts_with(item, name)));
                    match chosen {
                        Some(item) => {
                            let start = position;
                            position = self.matches(item, position)?;
                            count += 1;
                            if position == start {
                                break;
                            }
                        }
                        None => {
                            if count >= occurs.min || self.schema.nullable(particle) {
                                break;
                            }
                            return Err(self.missing(particle));
                        }
                    }
                }
            }
            Particle::All { items, .. } => {
                let mut used = vec![false; items.len()];
                while let Some(name) = self.name_at(position) {
                    let next = items
                        .iter()
                        .enumerate()
                        .find(|(i, item)| !used[*i] && self.schema.starts_with(item, name));
                    match next {
                        Some((i, item)) => {
                            position = self.matches(item, position)?;
                            used[i] = true;
                        }
                        None => break,
                    }
                }
                let any_used = used.iter().any(|u| *u);
                if any_used || occurs.min > 0 {
                    for (item, used) in items.iter().zip(used) {
                        if !used && !self.schema.nullable(item) {
                            return Err(self.missing(item));
                        }
                    }
                }
            }
        }
        Ok(position)
    }
}

/// Turns schema elements into declarations, types and particles
#[derive(Default)]
struct Builder<'x> {
    named_types: HashMap<&'x str, &'x Element>,
    named_groups: HashMap<&'x str, &'x Element>,
    type_ids: HashMap<&'x str, TypeId>,
    schema: Schema,
}

impl<'x> Builder<'x> {
    fn declare(&mut self, name: &str) -> DeclId {
        self.schema.declarations.push(Declaration {
            name: name.to_string(),
            ty: ElementType::AnyType,
        });
        self.schema.declarations.len() - 1
    }

    fn element_type(&mut self, element: &'x Element) -> ElementType {
        if let Some(inline) = element.children.iter().find(|c| c.name == "complexType") {
            return ElementType::Complex(self.complex_type(inline));
        }
        if element.children.iter().any(|c| c.name == "simpleType") {
            return ElementType::Simple;
        }
        let Some(type_name) = element.attribute("type") else {
            return ElementType::AnyType;
        };

        let local = local_part(type_name);
        if let Some(&id) = self.type_ids.get(local) {
            return ElementType::Complex(id);
        }
        match self.named_types.get(local).copied() {
            Some(definition) => {
                // Reserve the id before building so recursive types terminate
                let id = self.schema.types.len();
                self.schema.types.push(ComplexType::default());
                self.type_ids.insert(local, id);
                self.schema.types[id] = self.build_complex_type(definition);
                ElementType::Complex(id)
            }
            None if local == "anyType" => ElementType::AnyType,
            None => ElementType::Simple,
        }
    }

    fn complex_type(&mut self, definition: &'x Element) -> TypeId {
        let ty = self.build_complex_type(definition);
        self.schema.types.push(ty);
        self.schema.types.len() - 1
    }

    fn build_complex_type(&mut self, definition: &'x Element) -> ComplexType {
        let mut ty = ComplexType::default();
        for child in &definition.children {
            match child.name.as_str() {
                "attribute" | "attributeGroup" | "anyAttribute" => ty.attributes.add(child),
                "simpleContent" | "complexContent" => {
                    ty.attributes.open = true;
                    for derivation in &child.children {
                        for item in &derivation.children {
                            ty.attributes.add(item);
                        }
                    }
                    ty.content = if child.name == "simpleContent" {
                        Content::Empty
                    } else {
                        Content::Any
                    };
                }
                _ if is_particle(child) => ty.content = Content::Model(self.particle(child)),
                _ => {}
            }
        }
        ty
    }

    fn particles(&mut self, compositor: &'x Element) -> Vec<Particle> {
        compositor
            .children
            .iter()
            .filter(|c| is_particle(c))
            .map(|c| self.particle(c))
            .collect()
    }

    fn particle(&mut self, element: &'x Element) -> Particle {
        let occurs = Occurs::of(element);
        match element.name.as_str() {
            "element" => {
                let decl = match element.attribute("ref") {
                    Some(reference) => {
                        let local = local_part(reference);
                        match self.schema.globals.get(local) {
                            Some(&id) => id,
                            None => self.declare(local),
                        }
                    }
                    None => {
                        let id = self.declare(element.attribute("name").unwrap_or_default());
                        let ty = self.element_type(element);
                        self.schema.declarations[id].ty = ty;
                        id
                    }
                };
                Particle::Element { decl, occurs }
            }
            "sequence" => Particle::Sequence {
                items: self.particles(element),
                occurs,
            },
            "choice" => Particle::Choice {
                items: self.particles(element),
                occurs,
            },
            "all" => Particle::All {
                items: self.particles(element),
                occurs,
            },
            "group" => {
                let definition = element
                    .attribute("ref")
                    .and_then(|r| self.named_groups.get(local_part(r)).copied());
                match definition {
                    Some(definition) => Particle::Sequence {
                        items: self.particles(definition),
                        occurs,
                    },
                    None => Particle::Any { occurs },
                }
            }
            _ => Particle::Any { occurs },
        }
    }
}
