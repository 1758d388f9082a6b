//! Slot table - function pointers for a type descriptor
//!
//! The registration machinery copies these into the runtime's type
//! structure. A slot the class does not declare stays `None`, so the
//! runtime never routes it here. Dealloc is always installed.

use core::ffi::c_void;
use libc::{c_char, c_int, c_long};

use super::{
    slotbridge_class_call, slotbridge_class_compare, slotbridge_class_dealloc,
    slotbridge_class_getattr, slotbridge_class_getattro, slotbridge_class_hash,
    slotbridge_class_init, slotbridge_class_iter, slotbridge_class_iternext,
    slotbridge_class_repr, slotbridge_class_richcompare, slotbridge_class_setattr,
    slotbridge_class_setattro, slotbridge_class_str,
};
use crate::slots::{Slot, SlotSet};

pub type TernaryFunc = unsafe extern "C" fn(*mut c_void, *mut c_void, *mut c_void) -> *mut c_void;
pub type CmpFunc = unsafe extern "C" fn(*mut c_void, *mut c_void) -> c_int;
pub type GetAttrFunc = unsafe extern "C" fn(*mut c_void, *const c_char) -> *mut c_void;
pub type GetAttroFunc = unsafe extern "C" fn(*mut c_void, *mut c_void) -> *mut c_void;
pub type DestructorFunc = unsafe extern "C" fn(*mut c_void);
pub type HashFunc = unsafe extern "C" fn(*mut c_void) -> c_long;
pub type InitProc = unsafe extern "C" fn(*mut c_void, *mut c_void, *mut c_void) -> c_int;
pub type UnaryFunc = unsafe extern "C" fn(*mut c_void) -> *mut c_void;
pub type RichCmpFunc = unsafe extern "C" fn(*mut c_void, *mut c_void, c_int) -> *mut c_void;
pub type SetAttrFunc = unsafe extern "C" fn(*mut c_void, *const c_char, *mut c_void) -> c_int;
pub type SetAttroFunc = unsafe extern "C" fn(*mut c_void, *mut c_void, *mut c_void) -> c_int;

/// Native entry points for one class, `None` where no callback exists
#[derive(Debug, Clone, Copy)]
pub struct SlotTable {
    pub tp_call: Option<TernaryFunc>,
    pub tp_compare: Option<CmpFunc>,
    pub tp_getattr: Option<GetAttrFunc>,
    pub tp_getattro: Option<GetAttroFunc>,
    pub tp_dealloc: DestructorFunc,
    pub tp_hash: Option<HashFunc>,
    pub tp_init: Option<InitProc>,
    pub tp_iter: Option<UnaryFunc>,
    pub tp_iternext: Option<UnaryFunc>,
    pub tp_repr: Option<UnaryFunc>,
    pub tp_richcompare: Option<RichCmpFunc>,
    pub tp_setattr: Option<SetAttrFunc>,
    pub tp_setattro: Option<SetAttroFunc>,
    pub tp_str: Option<UnaryFunc>,
}

impl SlotTable {
    pub fn for_slots(slots: SlotSet) -> Self {
        let on = |slot: Slot| slots.contains(slot);

        Self {
            tp_call: on(Slot::Call).then_some(slotbridge_class_call as TernaryFunc),
            tp_compare: on(Slot::Compare).then_some(slotbridge_class_compare as CmpFunc),
            tp_getattr: on(Slot::GetAttr).then_some(slotbridge_class_getattr as GetAttrFunc),
            tp_getattro: on(Slot::GetAttrObj).then_some(slotbridge_class_getattro as GetAttroFunc),
            tp_dealloc: slotbridge_class_dealloc,
            tp_hash: on(Slot::Hash).then_some(slotbridge_class_hash as HashFunc),
            tp_init: on(Slot::Init).then_some(slotbridge_class_init as InitProc),
            tp_iter: on(Slot::Iter).then_some(slotbridge_class_iter as UnaryFunc),
            tp_iternext: on(Slot::IterNext).then_some(slotbridge_class_iternext as UnaryFunc),
            tp_repr: on(Slot::Repr).then_some(slotbridge_class_repr as UnaryFunc),
            tp_richcompare: on(Slot::RichCompare).then_some(slotbridge_class_richcompare as RichCmpFunc),
            tp_setattr: on(Slot::SetAttr).then_some(slotbridge_class_setattr as SetAttrFunc),
            tp_setattro: on(Slot::SetAttrObj).then_some(slotbridge_class_setattro as SetAttroFunc),
            tp_str: on(Slot::Str).then_some(slotbridge_class_str as UnaryFunc),
        }
    }

    /// Slots with an installed entry point
    pub fn installed(&self) -> SlotSet {
        let mut set = SlotSet::empty().with(Slot::Dealloc);
        let entries = [
            (Slot::Call, self.tp_call.is_some()),
            (Slot::Compare, self.tp_compare.is_some()),
            (Slot::GetAttr, self.tp_getattr.is_some()),
            (Slot::GetAttrObj, self.tp_getattro.is_some()),
            (Slot::Hash, self.tp_hash.is_some()),
            (Slot::Init, self.tp_init.is_some()),
            (Slot::Iter, self.tp_iter.is_some()),
            (Slot::IterNext, self.tp_iternext.is_some()),
            (Slot::Repr, self.tp_repr.is_some()),
            (Slot::RichCompare, self.tp_richcompare.is_some()),
            (Slot::SetAttr, self.tp_setattr.is_some()),
            (Slot::SetAttrObj, self.tp_setattro.is_some()),
            (Slot::Str, self.tp_str.is_some()),
        ];
        for (slot, present) in entries {
            if present {
                set.insert(slot);
            }
        }
        set
    }
}
