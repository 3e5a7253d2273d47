use quickcheck_macros::quickcheck;

use verity::{Cfg, Mutator, ORef};
use verity::{evaluate_truth, is_falsy, logical_not, true_value, false_value, from_bool};
use verity::builtins;
use verity::capability::Protocol;
use verity::exception::ExceptionKind;
use verity::object::Payload;
use verity::r#type::Type;
use verity::truth::EvaluationError;

fn payload(mt: &mut Mutator, v: ORef) -> isize {
    let n = match *mt.get(v).payload() {
        Payload::Int(n) => n,
        _ => 0
    };

    if n < 0 {
        mt.raise(ExceptionKind::ValueError, format!("slot failed with {}", n));
    }

    n
}

fn not_consulted(_: &mut Mutator, v: ORef) -> isize {
    panic!("lower priority slot of '{}' consulted", v.r#type().name())
}

fn number_first(mt: &mut Mutator, n: isize) -> ORef {
    let r#type = Type::builder("number_first")
        .nonzero(payload)
        .mapping_length(not_consulted)
        .sequence_length(not_consulted)
        .build(mt);
    mt.alloc(r#type, Payload::Int(n))
}

fn mapping_only(mt: &mut Mutator, n: isize) -> ORef {
    let r#type = Type::builder("mapping_only").mapping_length(payload).build(mt);
    mt.alloc(r#type, Payload::Int(n))
}

fn sequence_only(mt: &mut Mutator, n: isize) -> ORef {
    let r#type = Type::builder("sequence_only").sequence_length(payload).build(mt);
    mt.alloc(r#type, Payload::Int(n))
}

#[test]
fn singleton_fast_path() {
    let mut mt = Mutator::new(Cfg::default());

    let t = true_value(&mt);
    let f = false_value(&mt);
    let none = builtins::none(&mt);

    assert_eq!(evaluate_truth(&mut mt, t), Ok(true));
    assert_eq!(evaluate_truth(&mut mt, f), Ok(false));
    assert_eq!(evaluate_truth(&mut mt, none), Ok(false));
}

#[quickcheck]
fn numeric_conversion_decides(n: isize) -> bool {
    let mut mt = Mutator::new(Cfg::default());
    let v = number_first(&mut mt, n);

    match evaluate_truth(&mut mt, v) {
        Ok(truth) => n >= 0 && truth == (n > 0),
        Err(err) => n < 0 && err.protocol == Protocol::NumericConversion
    }
}

#[test]
fn mapping_length() {
    let mut mt = Mutator::new(Cfg::default());

    let empty = mapping_only(&mut mt, 0);
    assert_eq!(evaluate_truth(&mut mt, empty), Ok(false));

    let three = mapping_only(&mut mt, 3);
    assert_eq!(evaluate_truth(&mut mt, three), Ok(true));
}

#[test]
fn mapping_before_sequence() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("both_lengths")
        .mapping_length(payload)
        .sequence_length(not_consulted)
        .build(&mut mt);
    let v = mt.alloc(r#type, Payload::Int(0));

    assert_eq!(evaluate_truth(&mut mt, v), Ok(false));
}

#[test]
fn sequence_failure() {
    let mut mt = Mutator::new(Cfg::default());

    let v = sequence_only(&mut mt, -1);

    assert_eq!(evaluate_truth(&mut mt, v), Err(EvaluationError {
        protocol: Protocol::SequenceLength,
        type_name: "sequence_only"
    }));

    let exn = mt.take_exception().unwrap();
    assert_eq!(exn.kind, ExceptionKind::ValueError);
    assert_eq!(exn.message, "slot failed with -1");
}

#[test]
fn no_capabilities_is_truthy() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("opaque").build(&mut mt);
    let opaque = mt.alloc(r#type, Payload::Int(0));
    let obj = builtins::object(&mut mt);

    assert_eq!(evaluate_truth(&mut mt, opaque), Ok(true));
    assert_eq!(evaluate_truth(&mut mt, obj), Ok(true));
}

#[test]
fn from_bool_returns_singletons() {
    let mt = Mutator::new(Cfg::default());

    assert_eq!(from_bool(&mt, true), true_value(&mt));
    assert_eq!(from_bool(&mt, false), false_value(&mt));
}

#[quickcheck]
fn not_is_negated_truth(n: isize, kind: u8) -> bool {
    let mut mt = Mutator::new(Cfg::default());
    let v = match kind % 3 {
        0 => number_first(&mut mt, n),
        1 => mapping_only(&mut mt, n),
        _ => sequence_only(&mut mt, n)
    };
    let allocated = mt.heap().len();

    let truth = evaluate_truth(&mut mt, v);
    mt.take_exception();

    match (truth, logical_not(&mut mt, v)) {
        (Ok(truth), Ok(negated)) =>
            negated == from_bool(&mt, !truth) && mt.heap().len() == allocated,
        (Err(err), Err(not_err)) => err == not_err && mt.exception_occurred().is_some(),
        _ => false
    }
}

#[quickcheck]
fn is_falsy_agrees(n: isize) -> bool {
    let mut mt = Mutator::new(Cfg::default());
    let v = sequence_only(&mut mt, n);

    evaluate_truth(&mut mt, v).map(|b| !b) == is_falsy(&mut mt, v)
}

#[test]
fn from_bool_round_trip() {
    let mut mt = Mutator::new(Cfg::default());

    for b in [true, false] {
        let v = from_bool(&mt, b);
        let truth = evaluate_truth(&mut mt, v).unwrap();
        assert_eq!(from_bool(&mt, truth), from_bool(&mt, b));
    }
}

fn first_item_truth(mt: &mut Mutator, v: ORef) -> isize {
    let first = match mt.get(v).payload() {
        Payload::Tuple(items) => items.first().copied(),
        _ => None
    };

    match first {
        Some(item) => match evaluate_truth(mt, item) {
            Ok(truth) => truth as isize,
            Err(_) => -1
        },
        None => 0
    }
}

#[test]
fn reentrant_slot() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("wrapper").nonzero(first_item_truth).build(&mut mt);

    let failing = sequence_only(&mut mt, -5);
    let wrapped = mt.alloc(r#type, Payload::Tuple(vec![failing].into()));
    let err = evaluate_truth(&mut mt, wrapped).unwrap_err();

    assert_eq!(err.protocol, Protocol::NumericConversion);
    assert_eq!(err.type_name, "wrapper");
    // The inner cause is preserved:
    assert_eq!(mt.take_exception().map(|exn| exn.message),
        Some("slot failed with -5".to_string()));

    let empty = builtins::str(&mut mt, "");
    let wrapped = mt.alloc(r#type, Payload::Tuple(vec![empty].into()));
    assert_eq!(evaluate_truth(&mut mt, wrapped), Ok(false));
}

#[test]
fn list_truth_follows_mutation() {
    let mut mt = Mutator::new(Cfg::default());

    let ls = builtins::list(&mut mt, &[]);
    assert_eq!(evaluate_truth(&mut mt, ls), Ok(false));

    let none = builtins::none(&mt);
    if let Payload::List(items) = mt.get(ls).payload() {
        items.borrow_mut().push(none);
    }
    assert_eq!(evaluate_truth(&mut mt, ls), Ok(true));
}
