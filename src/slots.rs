//! Protocol slots - the fixed operations a runtime type can implement

use core::fmt;
use libc::c_int;

/// One protocol slot of the runtime's type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Slot {
    Call = 0,
    Compare = 1,
    GetAttr = 2,
    GetAttrObj = 3,
    Dealloc = 4,
    Hash = 5,
    Init = 6,
    Iter = 7,
    IterNext = 8,
    Repr = 9,
    RichCompare = 10,
    SetAttr = 11,
    SetAttrObj = 12,
    Str = 13,
}

impl Slot {
    pub const ALL: [Slot; 14] = [
        Slot::Call,
        Slot::Compare,
        Slot::GetAttr,
        Slot::GetAttrObj,
        Slot::Dealloc,
        Slot::Hash,
        Slot::Init,
        Slot::Iter,
        Slot::IterNext,
        Slot::Repr,
        Slot::RichCompare,
        Slot::SetAttr,
        Slot::SetAttrObj,
        Slot::Str,
    ];

    /// Field name in the runtime's type descriptor
    pub const fn name(self) -> &'static str {
        match self {
            Self::Call => "tp_call",
            Self::Compare => "tp_compare",
            Self::GetAttr => "tp_getattr",
            Self::GetAttrObj => "tp_getattro",
            Self::Dealloc => "tp_dealloc",
            Self::Hash => "tp_hash",
            Self::Init => "tp_init",
            Self::Iter => "tp_iter",
            Self::IterNext => "tp_iternext",
            Self::Repr => "tp_repr",
            Self::RichCompare => "tp_richcompare",
            Self::SetAttr => "tp_setattr",
            Self::SetAttrObj => "tp_setattro",
            Self::Str => "tp_str",
        }
    }

    #[inline]
    const fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of slots a class implements (its declared capabilities)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SlotSet {
    bits: u16,
}

impl SlotSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[inline]
    pub const fn contains(self, slot: Slot) -> bool {
        self.bits & slot.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, slot: Slot) {
        self.bits |= slot.bit();
    }

    pub const fn with(mut self, slot: Slot) -> Self {
        self.bits |= slot.bit();
        self
    }

    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Slot> {
        Slot::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Slot> for SlotSet {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        let mut set = Self::empty();
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}

impl fmt::Debug for SlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Rich comparison operator, in the runtime's numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CompareOp {
    Lt = 0,
    Le = 1,
    Eq = 2,
    Ne = 3,
    Gt = 4,
    Ge = 5,
}

impl CompareOp {
    pub const fn from_raw(code: c_int) -> Option<Self> {
        match code {
            0 => Some(Self::Lt),
            1 => Some(Self::Le),
            2 => Some(Self::Eq),
            3 => Some(Self::Ne),
            4 => Some(Self::Gt),
            5 => Some(Self::Ge),
            _ => None,
        }
    }

    /// Apply to an ordering (convenience for callback authors)
    pub fn matches(self, ord: core::cmp::Ordering) -> bool {
        use core::cmp::Ordering::*;
        match self {
            Self::Lt => ord == Less,
            Self::Le => ord != Greater,
            Self::Eq => ord == Equal,
            Self::Ne => ord != Equal,
            Self::Gt => ord == Greater,
            Self::Ge => ord != Less,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}
