//! Node kinds and the role catalog.
//!
//! Every [`NodeKind`] declares, statically, the roles it exposes: for each
//! role its slot kind (SIMPLE / CHILD / CHILDLIST) and whether it is
//! mandatory. A node stores its slots in the same order as
//! [`NodeKind::roles`], so a slot index is all the tree needs at runtime.
//! Lookups by `(kind, role)` go through one table built on first use.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::value::{TokenCategory, ValueKind};

/// How the matcher aligns a CHILDLIST role.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ListMode {
    /// Same length, element by element (arguments, parameters, ...).
    Exact,
    /// Pattern elements map in order onto a subset of candidate elements
    /// (statement lists).
    Subsequence,
}

/// Kind of storage behind a role.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SlotKind {
    Simple(ValueKind),
    Child,
    List(ListMode),
}

/// Static description of one role of one node kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RoleDesc {
    pub role: Role,
    pub slot: SlotKind,
    /// A mandatory CHILD slot must be filled in a consistent tree.
    pub mandatory: bool,
}

impl RoleDesc {
    const fn simple(role: Role, kind: ValueKind) -> Self {
        RoleDesc {
            role,
            slot: SlotKind::Simple(kind),
            mandatory: true,
        }
    }

    const fn child(role: Role) -> Self {
        RoleDesc {
            role,
            slot: SlotKind::Child,
            mandatory: true,
        }
    }

    const fn optional(role: Role) -> Self {
        RoleDesc {
            role,
            slot: SlotKind::Child,
            mandatory: false,
        }
    }

    const fn list(role: Role) -> Self {
        RoleDesc {
            role,
            slot: SlotKind::List(ListMode::Exact),
            mandatory: false,
        }
    }

    const fn sequence(role: Role) -> Self {
        RoleDesc {
            role,
            slot: SlotKind::List(ListMode::Subsequence),
            mandatory: false,
        }
    }

    #[inline]
    pub const fn is_simple(&self) -> bool {
        matches!(self.slot, SlotKind::Simple(_))
    }

    #[inline]
    pub const fn is_child(&self) -> bool {
        matches!(self.slot, SlotKind::Child)
    }

    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self.slot, SlotKind::List(_))
    }
}

/// Named structural slot through which a value or child hangs off a node.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    // SIMPLE
    Identifier,
    Token,
    BooleanValue,
    PrimitiveCode,
    TypeName,
    Op,
    Modifiers,
    Dimensions,

    // CHILD
    Name,
    Receiver,
    Expression,
    Condition,
    Then,
    Else,
    Body,
    Initializer,
    Type,
    ReturnType,
    LeftOperand,
    RightOperand,
    Operator,
    Operand,
    Qualifier,
    Array,
    Index,
    LeftHandSide,
    RightHandSide,
    ElementType,
    Parameter,
    Finally,
    Exception,
    Label,

    // CHILDLIST
    Arguments,
    Statements,
    Parameters,
    Fragments,
    TypeArguments,
    Initializers,
    Updaters,
    Catches,
}

impl Role {
    const ALL: [Role; 40] = [
        Role::Identifier,
        Role::Token,
        Role::BooleanValue,
        Role::PrimitiveCode,
        Role::TypeName,
        Role::Op,
        Role::Modifiers,
        Role::Dimensions,
        Role::Name,
        Role::Receiver,
        Role::Expression,
        Role::Condition,
        Role::Then,
        Role::Else,
        Role::Body,
        Role::Initializer,
        Role::Type,
        Role::ReturnType,
        Role::LeftOperand,
        Role::RightOperand,
        Role::Operator,
        Role::Operand,
        Role::Qualifier,
        Role::Array,
        Role::Index,
        Role::LeftHandSide,
        Role::RightHandSide,
        Role::ElementType,
        Role::Parameter,
        Role::Finally,
        Role::Exception,
        Role::Label,
        Role::Arguments,
        Role::Statements,
        Role::Parameters,
        Role::Fragments,
        Role::TypeArguments,
        Role::Initializers,
        Role::Updaters,
        Role::Catches,
    ];

    /// Snake-case name used in dumps and the tree notation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Identifier => "identifier",
            Role::Token => "token",
            Role::BooleanValue => "boolean_value",
            Role::PrimitiveCode => "primitive_code",
            Role::TypeName => "type_name",
            Role::Op => "op",
            Role::Modifiers => "modifiers",
            Role::Dimensions => "dimensions",
            Role::Name => "name",
            Role::Receiver => "receiver",
            Role::Expression => "expression",
            Role::Condition => "condition",
            Role::Then => "then",
            Role::Else => "else",
            Role::Body => "body",
            Role::Initializer => "initializer",
            Role::Type => "type",
            Role::ReturnType => "return_type",
            Role::LeftOperand => "left_operand",
            Role::RightOperand => "right_operand",
            Role::Operator => "operator",
            Role::Operand => "operand",
            Role::Qualifier => "qualifier",
            Role::Array => "array",
            Role::Index => "index",
            Role::LeftHandSide => "left_hand_side",
            Role::RightHandSide => "right_hand_side",
            Role::ElementType => "element_type",
            Role::Parameter => "parameter",
            Role::Finally => "finally",
            Role::Exception => "exception",
            Role::Label => "label",
            Role::Arguments => "arguments",
            Role::Statements => "statements",
            Role::Parameters => "parameters",
            Role::Fragments => "fragments",
            Role::TypeArguments => "type_arguments",
            Role::Initializers => "initializers",
            Role::Updaters => "updaters",
            Role::Catches => "catches",
        }
    }

    pub fn from_str(name: &str) -> Option<Role> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad syntactic class of a node kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum KindClass {
    Declaration,
    Statement,
    Expression,
    Literal,
    Type,
    /// Wrapper nodes with no source counterpart of their own.
    Virtual,
}

/// Closed set of syntactic node kinds.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Declarations
    MethodDeclaration,
    SingleVariableDeclaration,
    VariableDeclarationFragment,

    // Statements
    Block,
    ExpressionStatement,
    VariableDeclarationStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    EnhancedForStatement,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,

    // Expressions
    MethodInvocation,
    FieldAccess,
    QualifiedName,
    Assignment,
    InfixExpression,
    PrefixExpression,
    PostfixExpression,
    ClassInstanceCreation,
    ArrayAccess,
    CastExpression,
    ConditionalExpression,
    ParenthesizedExpression,
    InstanceofExpression,
    ThisExpression,
    SimpleName,

    // Literals
    NumberLiteral,
    StringLiteral,
    CharacterLiteral,
    BooleanLiteral,
    NullLiteral,

    // Types
    SimpleType,
    PrimitiveType,
    ArrayType,
    ParameterizedType,

    // Virtual
    Operator,
}

use RoleDesc as R;

const METHOD_DECLARATION: &[RoleDesc] = &[
    R::simple(Role::Modifiers, ValueKind::Modifiers),
    R::optional(Role::ReturnType),
    R::child(Role::Name),
    R::list(Role::Parameters),
    R::optional(Role::Body),
];
const SINGLE_VARIABLE_DECLARATION: &[RoleDesc] = &[
    R::simple(Role::Modifiers, ValueKind::Modifiers),
    R::child(Role::Type),
    R::child(Role::Name),
    R::optional(Role::Initializer),
];
const VARIABLE_DECLARATION_FRAGMENT: &[RoleDesc] =
    &[R::child(Role::Name), R::optional(Role::Initializer)];
const BLOCK: &[RoleDesc] = &[R::sequence(Role::Statements)];
const EXPRESSION_HOLDER: &[RoleDesc] = &[R::child(Role::Expression)];
const VARIABLE_DECLARATION_STATEMENT: &[RoleDesc] = &[
    R::simple(Role::Modifiers, ValueKind::Modifiers),
    R::child(Role::Type),
    R::list(Role::Fragments),
];
const IF_STATEMENT: &[RoleDesc] = &[
    R::child(Role::Condition),
    R::child(Role::Then),
    R::optional(Role::Else),
];
const WHILE_STATEMENT: &[RoleDesc] = &[R::child(Role::Condition), R::child(Role::Body)];
const FOR_STATEMENT: &[RoleDesc] = &[
    R::list(Role::Initializers),
    R::optional(Role::Condition),
    R::list(Role::Updaters),
    R::child(Role::Body),
];
const ENHANCED_FOR_STATEMENT: &[RoleDesc] = &[
    R::child(Role::Parameter),
    R::child(Role::Expression),
    R::child(Role::Body),
];
const RETURN_STATEMENT: &[RoleDesc] = &[R::optional(Role::Expression)];
const TRY_STATEMENT: &[RoleDesc] = &[
    R::child(Role::Body),
    R::list(Role::Catches),
    R::optional(Role::Finally),
];
const CATCH_CLAUSE: &[RoleDesc] = &[R::child(Role::Exception), R::child(Role::Body)];
const JUMP_STATEMENT: &[RoleDesc] = &[R::optional(Role::Label)];
const NO_ROLES: &[RoleDesc] = &[];
const METHOD_INVOCATION: &[RoleDesc] = &[
    R::optional(Role::Receiver),
    R::list(Role::TypeArguments),
    R::child(Role::Name),
    R::list(Role::Arguments),
];
const FIELD_ACCESS: &[RoleDesc] = &[R::child(Role::Expression), R::child(Role::Name)];
const QUALIFIED_NAME: &[RoleDesc] = &[R::child(Role::Qualifier), R::child(Role::Name)];
const ASSIGNMENT: &[RoleDesc] = &[
    R::child(Role::LeftHandSide),
    R::child(Role::Operator),
    R::child(Role::RightHandSide),
];
const INFIX_EXPRESSION: &[RoleDesc] = &[
    R::child(Role::LeftOperand),
    R::child(Role::Operator),
    R::child(Role::RightOperand),
];
const PREFIX_EXPRESSION: &[RoleDesc] = &[R::child(Role::Operator), R::child(Role::Operand)];
const POSTFIX_EXPRESSION: &[RoleDesc] = &[R::child(Role::Operand), R::child(Role::Operator)];
const CLASS_INSTANCE_CREATION: &[RoleDesc] = &[
    R::optional(Role::Expression),
    R::child(Role::Type),
    R::list(Role::Arguments),
];
const ARRAY_ACCESS: &[RoleDesc] = &[R::child(Role::Array), R::child(Role::Index)];
const CAST_EXPRESSION: &[RoleDesc] = &[R::child(Role::Type), R::child(Role::Expression)];
const CONDITIONAL_EXPRESSION: &[RoleDesc] = &[
    R::child(Role::Condition),
    R::child(Role::Then),
    R::child(Role::Else),
];
const INSTANCEOF_EXPRESSION: &[RoleDesc] =
    &[R::child(Role::LeftOperand), R::child(Role::RightOperand)];
const THIS_EXPRESSION: &[RoleDesc] = &[R::optional(Role::Qualifier)];
const SIMPLE_NAME: &[RoleDesc] = &[R::simple(Role::Identifier, ValueKind::Name)];
const LITERAL_TOKEN: &[RoleDesc] = &[R::simple(Role::Token, ValueKind::Literal)];
const BOOLEAN_LITERAL: &[RoleDesc] = &[R::simple(Role::BooleanValue, ValueKind::Bool)];
const SIMPLE_TYPE: &[RoleDesc] = &[R::simple(Role::TypeName, ValueKind::Name)];
const PRIMITIVE_TYPE: &[RoleDesc] = &[R::simple(Role::PrimitiveCode, ValueKind::Name)];
const ARRAY_TYPE: &[RoleDesc] = &[
    R::child(Role::ElementType),
    R::simple(Role::Dimensions, ValueKind::Count),
];
const PARAMETERIZED_TYPE: &[RoleDesc] = &[R::child(Role::Type), R::list(Role::TypeArguments)];
const OPERATOR: &[RoleDesc] = &[R::simple(Role::Op, ValueKind::Op)];

impl NodeKind {
    pub const ALL: [NodeKind; 42] = [
        NodeKind::MethodDeclaration,
        NodeKind::SingleVariableDeclaration,
        NodeKind::VariableDeclarationFragment,
        NodeKind::Block,
        NodeKind::ExpressionStatement,
        NodeKind::VariableDeclarationStatement,
        NodeKind::IfStatement,
        NodeKind::WhileStatement,
        NodeKind::ForStatement,
        NodeKind::EnhancedForStatement,
        NodeKind::ReturnStatement,
        NodeKind::ThrowStatement,
        NodeKind::TryStatement,
        NodeKind::CatchClause,
        NodeKind::BreakStatement,
        NodeKind::ContinueStatement,
        NodeKind::EmptyStatement,
        NodeKind::MethodInvocation,
        NodeKind::FieldAccess,
        NodeKind::QualifiedName,
        NodeKind::Assignment,
        NodeKind::InfixExpression,
        NodeKind::PrefixExpression,
        NodeKind::PostfixExpression,
        NodeKind::ClassInstanceCreation,
        NodeKind::ArrayAccess,
        NodeKind::CastExpression,
        NodeKind::ConditionalExpression,
        NodeKind::ParenthesizedExpression,
        NodeKind::InstanceofExpression,
        NodeKind::ThisExpression,
        NodeKind::SimpleName,
        NodeKind::NumberLiteral,
        NodeKind::StringLiteral,
        NodeKind::CharacterLiteral,
        NodeKind::BooleanLiteral,
        NodeKind::NullLiteral,
        NodeKind::SimpleType,
        NodeKind::PrimitiveType,
        NodeKind::ArrayType,
        NodeKind::ParameterizedType,
        NodeKind::Operator,
    ];

    /// Declared roles, in slot order.
    pub const fn roles(self) -> &'static [RoleDesc] {
        match self {
            NodeKind::MethodDeclaration => METHOD_DECLARATION,
            NodeKind::SingleVariableDeclaration => SINGLE_VARIABLE_DECLARATION,
            NodeKind::VariableDeclarationFragment => VARIABLE_DECLARATION_FRAGMENT,
            NodeKind::Block => BLOCK,
            NodeKind::ExpressionStatement
            | NodeKind::ThrowStatement
            | NodeKind::ParenthesizedExpression => EXPRESSION_HOLDER,
            NodeKind::VariableDeclarationStatement => VARIABLE_DECLARATION_STATEMENT,
            NodeKind::IfStatement => IF_STATEMENT,
            NodeKind::WhileStatement => WHILE_STATEMENT,
            NodeKind::ForStatement => FOR_STATEMENT,
            NodeKind::EnhancedForStatement => ENHANCED_FOR_STATEMENT,
            NodeKind::ReturnStatement => RETURN_STATEMENT,
            NodeKind::TryStatement => TRY_STATEMENT,
            NodeKind::CatchClause => CATCH_CLAUSE,
            NodeKind::BreakStatement | NodeKind::ContinueStatement => JUMP_STATEMENT,
            NodeKind::EmptyStatement | NodeKind::NullLiteral => NO_ROLES,
            NodeKind::MethodInvocation => METHOD_INVOCATION,
            NodeKind::FieldAccess => FIELD_ACCESS,
            NodeKind::QualifiedName => QUALIFIED_NAME,
            NodeKind::Assignment => ASSIGNMENT,
            NodeKind::InfixExpression => INFIX_EXPRESSION,
            NodeKind::PrefixExpression => PREFIX_EXPRESSION,
            NodeKind::PostfixExpression => POSTFIX_EXPRESSION,
            NodeKind::ClassInstanceCreation => CLASS_INSTANCE_CREATION,
            NodeKind::ArrayAccess => ARRAY_ACCESS,
            NodeKind::CastExpression => CAST_EXPRESSION,
            NodeKind::ConditionalExpression => CONDITIONAL_EXPRESSION,
            NodeKind::InstanceofExpression => INSTANCEOF_EXPRESSION,
            NodeKind::ThisExpression => THIS_EXPRESSION,
            NodeKind::SimpleName => SIMPLE_NAME,
            NodeKind::NumberLiteral | NodeKind::StringLiteral | NodeKind::CharacterLiteral => {
                LITERAL_TOKEN
            }
            NodeKind::BooleanLiteral => BOOLEAN_LITERAL,
            NodeKind::SimpleType => SIMPLE_TYPE,
            NodeKind::PrimitiveType => PRIMITIVE_TYPE,
            NodeKind::ArrayType => ARRAY_TYPE,
            NodeKind::ParameterizedType => PARAMETERIZED_TYPE,
            NodeKind::Operator => OPERATOR,
        }
    }

    pub const fn class(self) -> KindClass {
        match self {
            NodeKind::MethodDeclaration
            | NodeKind::SingleVariableDeclaration
            | NodeKind::VariableDeclarationFragment => KindClass::Declaration,
            NodeKind::Block
            | NodeKind::ExpressionStatement
            | NodeKind::VariableDeclarationStatement
            | NodeKind::IfStatement
            | NodeKind::WhileStatement
            | NodeKind::ForStatement
            | NodeKind::EnhancedForStatement
            | NodeKind::ReturnStatement
            | NodeKind::ThrowStatement
            | NodeKind::TryStatement
            | NodeKind::CatchClause
            | NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::EmptyStatement => KindClass::Statement,
            NodeKind::MethodInvocation
            | NodeKind::FieldAccess
            | NodeKind::QualifiedName
            | NodeKind::Assignment
            | NodeKind::InfixExpression
            | NodeKind::PrefixExpression
            | NodeKind::PostfixExpression
            | NodeKind::ClassInstanceCreation
            | NodeKind::ArrayAccess
            | NodeKind::CastExpression
            | NodeKind::ConditionalExpression
            | NodeKind::ParenthesizedExpression
            | NodeKind::InstanceofExpression
            | NodeKind::ThisExpression
            | NodeKind::SimpleName => KindClass::Expression,
            NodeKind::NumberLiteral
            | NodeKind::StringLiteral
            | NodeKind::CharacterLiteral
            | NodeKind::BooleanLiteral
            | NodeKind::NullLiteral => KindClass::Literal,
            NodeKind::SimpleType
            | NodeKind::PrimitiveType
            | NodeKind::ArrayType
            | NodeKind::ParameterizedType => KindClass::Type,
            NodeKind::Operator => KindClass::Virtual,
        }
    }

    /// Statements and declarations: the granularity patterns are cut at.
    pub const fn is_statement_level(self) -> bool {
        matches!(self.class(), KindClass::Statement | KindClass::Declaration)
    }

    /// The SIMPLE role holding a generalizable token, with its category.
    ///
    /// Keyword-like leaves (booleans, `null`, primitive types, operators)
    /// have none.
    pub const fn token_role(self) -> Option<(Role, TokenCategory)> {
        match self {
            NodeKind::SimpleName => Some((Role::Identifier, TokenCategory::Name)),
            NodeKind::NumberLiteral | NodeKind::StringLiteral | NodeKind::CharacterLiteral => {
                Some((Role::Token, TokenCategory::Literal))
            }
            NodeKind::SimpleType => Some((Role::TypeName, TokenCategory::Type)),
            _ => None,
        }
    }

    /// The only role of a single-SIMPLE-slot leaf kind, if this is one.
    pub fn sole_simple_role(self) -> Option<RoleDesc> {
        match self.roles() {
            [only] if only.is_simple() => Some(*only),
            _ => None,
        }
    }

    /// Slot index of `role` in nodes of this kind.
    #[inline]
    pub fn slot_index(self, role: Role) -> Option<usize> {
        role_table().slots.get(&(self, role)).copied()
    }

    /// Descriptor of `role` for this kind.
    pub fn role_desc(self, role: Role) -> Option<RoleDesc> {
        self.slot_index(role).map(|i| self.roles()[i])
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::MethodDeclaration => "MethodDeclaration",
            NodeKind::SingleVariableDeclaration => "SingleVariableDeclaration",
            NodeKind::VariableDeclarationFragment => "VariableDeclarationFragment",
            NodeKind::Block => "Block",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::VariableDeclarationStatement => "VariableDeclarationStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::EnhancedForStatement => "EnhancedForStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::ThrowStatement => "ThrowStatement",
            NodeKind::TryStatement => "TryStatement",
            NodeKind::CatchClause => "CatchClause",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::MethodInvocation => "MethodInvocation",
            NodeKind::FieldAccess => "FieldAccess",
            NodeKind::QualifiedName => "QualifiedName",
            NodeKind::Assignment => "Assignment",
            NodeKind::InfixExpression => "InfixExpression",
            NodeKind::PrefixExpression => "PrefixExpression",
            NodeKind::PostfixExpression => "PostfixExpression",
            NodeKind::ClassInstanceCreation => "ClassInstanceCreation",
            NodeKind::ArrayAccess => "ArrayAccess",
            NodeKind::CastExpression => "CastExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::ParenthesizedExpression => "ParenthesizedExpression",
            NodeKind::InstanceofExpression => "InstanceofExpression",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::SimpleName => "SimpleName",
            NodeKind::NumberLiteral => "NumberLiteral",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::CharacterLiteral => "CharacterLiteral",
            NodeKind::BooleanLiteral => "BooleanLiteral",
            NodeKind::NullLiteral => "NullLiteral",
            NodeKind::SimpleType => "SimpleType",
            NodeKind::PrimitiveType => "PrimitiveType",
            NodeKind::ArrayType => "ArrayType",
            NodeKind::ParameterizedType => "ParameterizedType",
            NodeKind::Operator => "Operator",
        }
    }

    pub fn from_str(name: &str) -> Option<NodeKind> {
        role_table().kinds.get(name).copied()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide lookup tables derived from the static catalog.
struct RoleTable {
    slots: FxHashMap<(NodeKind, Role), usize>,
    kinds: FxHashMap<&'static str, NodeKind>,
}

impl RoleTable {
    fn build() -> Self {
        let mut slots = FxHashMap::default();
        let mut kinds = FxHashMap::default();
        for kind in NodeKind::ALL {
            kinds.insert(kind.as_str(), kind);
            for (index, desc) in kind.roles().iter().enumerate() {
                let previous = slots.insert((kind, desc.role), index);
                debug_assert!(previous.is_none(), "{kind} declares {} twice", desc.role);
            }
        }
        RoleTable { slots, kinds }
    }
}

static ROLE_TABLE: OnceLock<RoleTable> = OnceLock::new();

fn role_table() -> &'static RoleTable {
    ROLE_TABLE.get_or_init(RoleTable::build)
}
