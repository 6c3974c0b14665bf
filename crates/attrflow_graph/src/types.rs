// SPDX-License-Identifier: MIT OR Apache-2.0
//! Closed type tables for node kinds and value kinds.
//!
//! The downstream generator matches on these names verbatim, so both tables
//! are versioned: adding a variant is fine, renaming one is a wire change.

use serde::{Deserialize, Serialize};

/// Name reserved for values that do not map onto any [`ValueKind`].
pub const NO_TYPE_NAME: &str = "__no_type__";

/// Name reserved for strings that do not map onto any [`NodeKind`].
pub const INVALID_TYPE_NAME: &str = "__invalid_type__";

/// Role a node plays in the exported attribute description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Object attribute nodes (unit, attribute and numeric kinds).
    Object,
    /// Argument nodes feeding the end terminal.
    Argument,
    /// Member nodes, always exported regardless of connectivity.
    Member,
    /// The single end terminal that roots the export walk.
    End,
}

impl ValueKind {
    /// All value kinds, in table order.
    pub const ALL: [ValueKind; 4] = [
        ValueKind::Object,
        ValueKind::Argument,
        ValueKind::Member,
        ValueKind::End,
    ];

    /// Wire name of this value kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Object => "OBJECT",
            ValueKind::Argument => "ARGUMENT",
            ValueKind::Member => "MEMBER",
            ValueKind::End => "END",
        }
    }

    /// Reverse lookup. Unknown names yield `None` rather than an error;
    /// callers that need a string back should fall back to [`NO_TYPE_NAME`].
    pub fn from_name(name: &str) -> Option<ValueKind> {
        ValueKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Concrete node kind. Covers the argument scalar types, the member types
/// and the object unit/attribute/numeric families, plus the reserved end
/// terminal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum NodeKind {
    Boolean,
    Double,
    Float,
    Integer,
    Str,
    Character,
    Vector,
    Matrix,
    AngleUnit,
    DistanceUnit,
    TimeUnit,
    LastValueUnit,
    CompoundAttribute,
    EnumAttribute,
    GenericAttribute,
    MatrixAttribute,
    MessageAttribute,
    BooleanNumeric,
    OneByteNumeric,
    OneCharNumeric,
    OneShortNumeric,
    TwoShortNumeric,
    ThreeShortNumeric,
    OneLongNumeric,
    OneIntNumeric,
    TwoLongNumeric,
    TwoIntNumeric,
    ThreeLongNumeric,
    ThreeIntNumeric,
    OneFloatNumeric,
    TwoFloatNumeric,
    ThreeFloatNumeric,
    OneDoubleNumeric,
    TwoDoubleNumeric,
    ThreeDoubleNumeric,
    FourDoubleNumeric,
    AddressNumeric,
    LastValueNumeric,
    /// Reserved kind for the end terminal node.
    EndNode,
}

impl NodeKind {
    /// All node kinds, in table order.
    pub const ALL: [NodeKind; 39] = [
        NodeKind::Boolean,
        NodeKind::Double,
        NodeKind::Float,
        NodeKind::Integer,
        NodeKind::Str,
        NodeKind::Character,
        NodeKind::Vector,
        NodeKind::Matrix,
        NodeKind::AngleUnit,
        NodeKind::DistanceUnit,
        NodeKind::TimeUnit,
        NodeKind::LastValueUnit,
        NodeKind::CompoundAttribute,
        NodeKind::EnumAttribute,
        NodeKind::GenericAttribute,
        NodeKind::MatrixAttribute,
        NodeKind::MessageAttribute,
        NodeKind::BooleanNumeric,
        NodeKind::OneByteNumeric,
        NodeKind::OneCharNumeric,
        NodeKind::OneShortNumeric,
        NodeKind::TwoShortNumeric,
        NodeKind::ThreeShortNumeric,
        NodeKind::OneLongNumeric,
        NodeKind::OneIntNumeric,
        NodeKind::TwoLongNumeric,
        NodeKind::TwoIntNumeric,
        NodeKind::ThreeLongNumeric,
        NodeKind::ThreeIntNumeric,
        NodeKind::OneFloatNumeric,
        NodeKind::TwoFloatNumeric,
        NodeKind::ThreeFloatNumeric,
        NodeKind::OneDoubleNumeric,
        NodeKind::TwoDoubleNumeric,
        NodeKind::ThreeDoubleNumeric,
        NodeKind::FourDoubleNumeric,
        NodeKind::AddressNumeric,
        NodeKind::LastValueNumeric,
        NodeKind::EndNode,
    ];

    /// Human-readable (and wire) name of this node kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Boolean => "Boolean",
            NodeKind::Double => "Double",
            NodeKind::Float => "Float",
            NodeKind::Integer => "Integer",
            NodeKind::Str => "String",
            NodeKind::Character => "Character",
            NodeKind::Vector => "Vector",
            NodeKind::Matrix => "Matrix",
            NodeKind::AngleUnit => "Angle Unit",
            NodeKind::DistanceUnit => "Distance Unit",
            NodeKind::TimeUnit => "Time Unit",
            NodeKind::LastValueUnit => "Last Value Unit",
            NodeKind::CompoundAttribute => "Compound Attribute",
            NodeKind::EnumAttribute => "Enum Attribute",
            NodeKind::GenericAttribute => "Generic Attribute",
            NodeKind::MatrixAttribute => "Matrix Attribute",
            NodeKind::MessageAttribute => "Message Attribute",
            NodeKind::BooleanNumeric => "Boolean Numeric",
            NodeKind::OneByteNumeric => "One Byte Numeric",
            NodeKind::OneCharNumeric => "One Char Numeric",
            NodeKind::OneShortNumeric => "One Short Numeric",
            NodeKind::TwoShortNumeric => "Two Shorts Numeric",
            NodeKind::ThreeShortNumeric => "Three Shorts Numeric",
            NodeKind::OneLongNumeric => "One Long Numeric",
            NodeKind::OneIntNumeric => "One Int Numeric",
            NodeKind::TwoLongNumeric => "Two Longs Numeric",
            NodeKind::TwoIntNumeric => "Two Ints Numeric",
            NodeKind::ThreeLongNumeric => "Three Longs Numeric",
            NodeKind::ThreeIntNumeric => "Three Ints Numeric",
            NodeKind::OneFloatNumeric => "One Float Numeric",
            NodeKind::TwoFloatNumeric => "Two Floats Numeric",
            NodeKind::ThreeFloatNumeric => "Three Floats Numeric",
            NodeKind::OneDoubleNumeric => "One Double Numeric",
            NodeKind::TwoDoubleNumeric => "Two Doubles Numeric",
            NodeKind::ThreeDoubleNumeric => "Three Doubles Numeric",
            NodeKind::FourDoubleNumeric => "Four Doubles Numeric",
            NodeKind::AddressNumeric => "Address Numeric",
            NodeKind::LastValueNumeric => "Last Value Numeric",
            NodeKind::EndNode => "__end_node__",
        }
    }

    /// Reverse lookup. Unknown names yield `None`; callers that need a
    /// string back should fall back to [`INVALID_TYPE_NAME`].
    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Kinds offered in the object creation menu.
    pub fn object_kinds() -> &'static [NodeKind] {
        const KINDS: [NodeKind; 30] = [
            NodeKind::AngleUnit,
            NodeKind::DistanceUnit,
            NodeKind::TimeUnit,
            NodeKind::LastValueUnit,
            NodeKind::CompoundAttribute,
            NodeKind::EnumAttribute,
            NodeKind::GenericAttribute,
            NodeKind::MatrixAttribute,
            NodeKind::MessageAttribute,
            NodeKind::BooleanNumeric,
            NodeKind::OneByteNumeric,
            NodeKind::OneCharNumeric,
            NodeKind::OneShortNumeric,
            NodeKind::TwoShortNumeric,
            NodeKind::ThreeShortNumeric,
            NodeKind::OneLongNumeric,
            NodeKind::OneIntNumeric,
            NodeKind::TwoLongNumeric,
            NodeKind::TwoIntNumeric,
            NodeKind::ThreeLongNumeric,
            NodeKind::ThreeIntNumeric,
            NodeKind::OneFloatNumeric,
            NodeKind::TwoFloatNumeric,
            NodeKind::ThreeFloatNumeric,
            NodeKind::OneDoubleNumeric,
            NodeKind::TwoDoubleNumeric,
            NodeKind::ThreeDoubleNumeric,
            NodeKind::FourDoubleNumeric,
            NodeKind::AddressNumeric,
            NodeKind::LastValueNumeric,
        ];
        &KINDS
    }

    /// Kinds offered in the argument creation menu.
    pub fn argument_kinds() -> &'static [NodeKind] {
        const KINDS: [NodeKind; 6] = [
            NodeKind::Boolean,
            NodeKind::Character,
            NodeKind::Double,
            NodeKind::Float,
            NodeKind::Integer,
            NodeKind::Str,
        ];
        &KINDS
    }

    /// Kinds offered in the member creation menu.
    pub fn member_kinds() -> &'static [NodeKind] {
        const KINDS: [NodeKind; 8] = [
            NodeKind::Boolean,
            NodeKind::Character,
            NodeKind::Double,
            NodeKind::Float,
            NodeKind::Integer,
            NodeKind::Str,
            NodeKind::Vector,
            NodeKind::Matrix,
        ];
        &KINDS
    }
}
