//! Data model for the parsed documentation tree — parser-independent.
//!
//! The XML parser lowers the Doxygen export into these owned types so that
//! indexing and emission never touch the DOM (or its lifetimes) again.

/// Kind of a documentable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundKind {
    Class,
    Struct,
    Namespace,
    /// Files, directories, groups, pages — ignored.
    Other,
}

impl CompoundKind {
    pub fn from_attr(kind: Option<&str>) -> Self {
        match kind {
            Some("class") => CompoundKind::Class,
            Some("struct") => CompoundKind::Struct,
            Some("namespace") => CompoundKind::Namespace,
            _ => CompoundKind::Other,
        }
    }
}

/// Kind of a documentable member nested in a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Function,
    Variable,
    Typedef,
    Enum,
    Other,
}

impl MemberKind {
    pub fn from_attr(kind: Option<&str>) -> Self {
        match kind {
            Some("function") => MemberKind::Function,
            Some("variable") => MemberKind::Variable,
            Some("typedef") => MemberKind::Typedef,
            Some("enum") => MemberKind::Enum,
            _ => MemberKind::Other,
        }
    }
}

/// Protection level of a compound or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    Public,
    Protected,
    Private,
}

impl Protection {
    /// A missing or unrecognized `prot` attribute is treated as private,
    /// which keeps the entity out of the emitted output.
    pub fn from_attr(prot: Option<&str>) -> Self {
        match prot {
            Some("public") => Protection::Public,
            Some("protected") => Protection::Protected,
            _ => Protection::Private,
        }
    }
}

/// One template parameter, e.g. `typename T`, `class Derived`, or the
/// non-type `int N`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateParam {
    /// `typename`, `class`, or a concrete type for non-type parameters.
    pub kind: String,
    /// Parameter name; empty for anonymous non-type parameters.
    pub name: String,
}

/// One fragment of a type expression: either a cross-reference marker or
/// plain text, each followed by trailing text up to the next fragment.
#[derive(Debug, Clone, Default)]
pub struct TypePart {
    /// `Some(refid)` marks "this text denotes the entity identified by refid".
    pub refid: Option<String>,
    pub text: String,
    pub tail: String,
}

/// A type as written in the documentation: leading text plus an ordered
/// sequence of fragments mixing literal tokens and cross-references.
#[derive(Debug, Clone, Default)]
pub struct TypeExpr {
    pub text: String,
    pub parts: Vec<TypePart>,
}

impl TypeExpr {
    /// An empty return type identifies a constructor or destructor.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.parts.is_empty()
    }
}

/// Description tree node. Only element text is significant for docstrings;
/// trailing text between siblings is not part of the rendered description.
#[derive(Debug, Clone, Default)]
pub struct DocNode {
    pub text: String,
    pub children: Vec<DocNode>,
}

/// A documentable entity nested in a compound.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: String,
    pub kind: MemberKind,
    pub prot: Protection,
    /// Bare name, e.g. `norm` or `~Point`.
    pub name: String,
    /// Qualified definition text, e.g. `double Point::norm`. Used as the
    /// reference name for collision reporting.
    pub definition: String,
    pub is_const: bool,
    pub is_static: bool,
    pub return_type: TypeExpr,
    /// Parameter types, in declaration order.
    pub params: Vec<TypeExpr>,
    pub template_params: Vec<TemplateParam>,
    /// Ids of enum values, for `kind == Enum`.
    pub enum_values: Vec<String>,
    pub brief: DocNode,
    pub detailed: DocNode,
}

/// A documentable container: class, struct, or namespace.
#[derive(Debug, Clone)]
pub struct Compound {
    pub id: String,
    /// Fully qualified name, e.g. `ns::Foo`.
    pub name: String,
    pub kind: CompoundKind,
    pub prot: Protection,
    pub template_params: Vec<TemplateParam>,
    /// All members, flattened across sections in document order.
    pub members: Vec<Member>,
}
