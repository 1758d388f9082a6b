//! Entry point tests through the process-wide bridge

use once_cell::sync::Lazy;
use std::ffi::CString;
use std::ptr;
use std::sync::Arc;
use std::thread;

use super::*;
use crate::dispatch::{HASH_FAILED, STATUS_OK};
use crate::error::{ErrorKind, SlotError};
use crate::marshal::Value;
use crate::mock::MockHost;
use crate::slots::SlotSet;

static HOST: Lazy<Arc<MockHost>> = Lazy::new(|| Arc::new(MockHost::new()));

static INSTALLED: Lazy<&'static Bridge> = Lazy::new(|| {
    let host: Arc<dyn Host> = HOST.clone();
    install(host, BridgeConfig::default()).expect("first install succeeds")
});

/// Register `ctx` under a fresh type and return one instance of it
fn instance_of(ctx: ClassContext) -> (ObjectHandle, SlotTable) {
    Lazy::force(&INSTALLED);
    let ty = HOST.new_type();
    let table = register_class(ty, ctx).unwrap();
    (HOST.new_instance(ty), table)
}

#[test]
fn test_install_twice_fails() {
    Lazy::force(&INSTALLED);
    let host: Arc<dyn Host> = Arc::new(MockHost::new());
    assert_eq!(
        install(host, BridgeConfig::default()).err(),
        Some(BridgeError::AlreadyInstalled)
    );
    assert!(bridge().is_ok());
}

#[test]
fn test_slot_table_matches_declared_slots() {
    let (_, table) = instance_of(
        ClassContext::builder("Keyed")
            .hash(|_| Ok(1))
            .repr(|_| "Keyed".into())
            .build(),
    );

    assert!(table.tp_hash.is_some());
    assert!(table.tp_repr.is_some());
    assert!(table.tp_call.is_none());
    assert!(table.tp_iternext.is_none());
    assert_eq!(
        table.installed(),
        SlotSet::empty()
            .with(Slot::Hash)
            .with(Slot::Repr)
            .with(Slot::Dealloc)
    );
}

#[test]
fn test_reregister_keeps_installed_table_valid() {
    Lazy::force(&INSTALLED);
    let ty = HOST.new_type();
    let table = register_class(ty, ClassContext::builder("V1").hash(|_| Ok(5)).build()).unwrap();

    let second = register_class(ty, ClassContext::builder("V2").repr(|_| "V2".into()).build());
    assert_eq!(second.err(), Some(BridgeError::AlreadyRegistered(ty)));

    let obj = HOST.new_instance(ty);
    let hash = table.tp_hash.unwrap();
    assert_eq!(unsafe { hash(obj.as_raw()) }, 5);
    assert!(HOST.take_errors().is_empty());
}

#[test]
fn test_call_entry_point() {
    let (obj, _) = instance_of(
        ClassContext::builder("Adder")
            .call(|_, args, _| Ok(Value::Int(args.int(0)? + args.int(1)?)))
            .build(),
    );
    let args = HOST.tuple(&[HOST.int(3), HOST.int(4)]);

    let ret = unsafe { slotbridge_class_call(obj.as_raw(), args.as_raw(), ptr::null_mut()) };

    assert_eq!(HOST.decode(ObjectHandle::from_raw(ret)), Value::Int(7));
    assert!(HOST.take_errors().is_empty());
}

#[test]
fn test_table_pointer_dispatches() {
    let (obj, table) = instance_of(ClassContext::builder("Keyed").hash(|_| Ok(99)).build());

    let hash = table.tp_hash.unwrap();
    assert_eq!(unsafe { hash(obj.as_raw()) }, 99);
    assert!(HOST.take_errors().is_empty());
}

#[test]
fn test_hash_entry_point_failure() {
    let (obj, _) = instance_of(
        ClassContext::builder("Unhashable")
            .hash(|_| Err(SlotError::type_error("unhashable")))
            .build(),
    );

    assert_eq!(unsafe { slotbridge_class_hash(obj.as_raw()) }, HASH_FAILED);
    let errors = HOST.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::TypeError);
}

#[test]
fn test_getattr_and_setattr_entry_points() {
    let (obj, _) = instance_of(
        ClassContext::builder("Record")
            .getattr(|_, name| Ok(Value::Str(name.to_string())))
            .setattr(|_, _, value| match value {
                None => Err(SlotError::attribute_error("cannot delete")),
                Some(_) => Ok(()),
            })
            .build(),
    );
    let attr = CString::new("colour").unwrap();

    let ret = unsafe { slotbridge_class_getattr(obj.as_raw(), attr.as_ptr()) };
    assert_eq!(HOST.decode(ObjectHandle::from_raw(ret)), Value::Str("colour".into()));

    let value = HOST.int(1);
    let status = unsafe { slotbridge_class_setattr(obj.as_raw(), attr.as_ptr(), value.as_raw()) };
    assert_eq!(status, STATUS_OK);
    assert!(HOST.take_errors().is_empty());

    let status = unsafe { slotbridge_class_setattr(obj.as_raw(), attr.as_ptr(), ptr::null_mut()) };
    assert_eq!(status, -1);
    assert_eq!(HOST.take_errors()[0].message, "cannot delete");
}

#[test]
fn test_iternext_entry_point_exhaustion() {
    let (obj, _) = instance_of(ClassContext::builder("Empty").iternext(|_| Ok(None)).build());

    let ret = unsafe { slotbridge_class_iternext(obj.as_raw()) };

    assert!(ret.is_null());
    assert!(HOST.take_errors().is_empty());
}

#[test]
fn test_dealloc_entry_point_default() {
    let (obj, _) = instance_of(ClassContext::builder("Plain").build());

    unsafe { slotbridge_class_dealloc(obj.as_raw()) };

    assert!(HOST.deallocated().contains(&obj));
}

#[test]
fn test_reentrant_dispatch_keeps_outer_arguments() {
    let (inner, _) = instance_of(ClassContext::builder("Inner").hash(|_| Ok(40)).build());
    let (outer, _) = instance_of(
        ClassContext::builder("Outer")
            .call(move |_, args, _| {
                let nested = unsafe { slotbridge_class_hash(inner.as_raw()) };
                // Outer views still read their own tuple after the nested dispatch
                Ok(Value::Int(nested as i64 + args.int(0)?))
            })
            .build(),
    );
    let args = HOST.tuple(&[HOST.int(2)]);

    let ret = unsafe { slotbridge_class_call(outer.as_raw(), args.as_raw(), ptr::null_mut()) };

    assert_eq!(HOST.decode(ObjectHandle::from_raw(ret)), Value::Int(42));
    assert!(HOST.take_errors().is_empty());
}

#[test]
fn test_reentrant_dispatch_on_same_instance() {
    let (obj, _) = instance_of(
        ClassContext::builder("SelfAware")
            .repr(|_| "SelfAware".into())
            .str(|obj| {
                let repr = unsafe { slotbridge_class_repr(obj.as_raw()) };
                match HOST.decode(ObjectHandle::from_raw(repr)) {
                    Value::Str(s) => format!("<{}>", s),
                    _ => String::from("<?>"),
                }
            })
            .build(),
    );

    let ret = unsafe { slotbridge_class_str(obj.as_raw()) };

    assert_eq!(HOST.decode(ObjectHandle::from_raw(ret)), Value::Str("<SelfAware>".into()));
}

#[test]
fn test_register_from_inside_callback() {
    let (obj, _) = instance_of(
        ClassContext::builder("Factory")
            .call(|_, _, _| {
                let ty = HOST.new_type();
                register_class(ty, ClassContext::builder("Product").hash(|_| Ok(3)).build())
                    .map_err(|e| SlotError::runtime_error(e.to_string()))?;
                let product = HOST.new_instance(ty);
                let hash = unsafe { slotbridge_class_hash(product.as_raw()) };
                Ok(Value::Int(hash as i64))
            })
            .build(),
    );

    let ret = unsafe { slotbridge_class_call(obj.as_raw(), ptr::null_mut(), ptr::null_mut()) };

    assert_eq!(HOST.decode(ObjectHandle::from_raw(ret)), Value::Int(3));
}

#[test]
fn test_error_state_is_per_thread() {
    let (obj, _) = instance_of(
        ClassContext::builder("Strict")
            .init(|_, args, _| {
                if args.is_empty() {
                    Err(SlotError::value_error("bad value"))
                } else {
                    Ok(())
                }
            })
            .build(),
    );
    let addr = obj.addr();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let obj = addr as *mut c_void;
                let args = if i % 2 == 0 {
                    HOST.tuple(&[HOST.int(i)])
                } else {
                    ObjectHandle::null()
                };
                let status = unsafe { slotbridge_class_init(obj, args.as_raw(), ptr::null_mut()) };
                (i, status, HOST.take_errors())
            })
        })
        .collect();

    for worker in workers {
        let (i, status, errors) = worker.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(status, STATUS_OK);
            assert!(errors.is_empty());
        } else {
            assert_eq!(status, -1);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "bad value");
        }
    }
}
