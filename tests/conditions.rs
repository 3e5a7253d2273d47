use verity::{Cfg, Mutator, ORef};
use verity::condition::{eval, Expr};
use verity::exception::ExceptionKind;
use verity::object::Payload;
use verity::reader::Reader;
use verity::r#type::Type;

fn eval_string(mt: &mut Mutator, s: &str) -> String {
    let mut reader = Reader::new(s);

    let expr = reader.next(mt).unwrap().unwrap();
    let v = eval(mt, &expr.v).unwrap();

    assert!(reader.next(mt).is_none());

    v.within(mt).to_string()
}

#[test]
fn literals_and_operators() {
    let mut mt = Mutator::new(Cfg::default());

    assert_eq!(eval_string(&mut mt, "not None"), "True");
    assert_eq!(eval_string(&mut mt, "not 0.0"), "True");
    assert_eq!(eval_string(&mut mt, "not {'k': 0}"), "False");
    assert_eq!(eval_string(&mut mt, "[] or {} or ()"), "()");
    assert_eq!(eval_string(&mut mt, "'a' and (0,)"), "(0,)");
    assert_eq!(eval_string(&mut mt, "not object()"), "False");
}

fn explode(mt: &mut Mutator, _: ORef) -> isize {
    mt.raise(ExceptionKind::RuntimeError, "boom");
    -1
}

#[test]
fn short_circuit_skips_truth_of_last_operand() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("explosive").nonzero(explode).build(&mut mt);
    let bomb = mt.alloc(r#type, Payload::Unit);

    let mut reader = Reader::new("1 and 2");
    let expr = reader.next(&mut mt).unwrap().unwrap().v;

    // Swap the constant `2` for `bomb`: the final operand of `and` is returned, never tested.
    let expr = match expr {
        Expr::And(first, _) => Expr::And(first, vec![Expr::Const(bomb)]),
        _ => unreachable!()
    };

    assert_eq!(eval(&mut mt, &expr), Ok(bomb));
    assert!(mt.exception_occurred().is_none());
}

#[test]
fn failing_operand_propagates() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("explosive").nonzero(explode).build(&mut mt);
    let bomb = mt.alloc(r#type, Payload::Unit);
    let zero = verity::builtins::int(&mut mt, 0);

    let or = Expr::Or(Box::new(Expr::Const(bomb)), vec![Expr::Const(zero)]);
    let err = eval(&mut mt, &or).unwrap_err();
    assert_eq!(err.type_name, "explosive");
    assert_eq!(mt.take_exception().map(|exn| exn.kind), Some(ExceptionKind::RuntimeError));

    let not = Expr::Not(Box::new(Expr::Const(bomb)));
    assert!(eval(&mut mt, &not).is_err());

    // Decided before reaching `bomb`:
    let and = Expr::And(Box::new(Expr::Const(zero)), vec![Expr::Not(Box::new(Expr::Const(bomb)))]);
    assert_eq!(eval(&mut mt, &and), Ok(zero));
}

#[test]
fn conditional_evaluates_one_branch() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("explosive").nonzero(explode).build(&mut mt);
    let bomb = mt.alloc(r#type, Payload::Unit);
    let one = verity::builtins::int(&mut mt, 1);
    let empty = verity::builtins::list(&mut mt, &[]);

    let detonate = || Box::new(Expr::Not(Box::new(Expr::Const(bomb))));

    let taken_yes = Expr::Conditional(Box::new(Expr::Const(one)),
        Box::new(Expr::Const(one)), detonate());
    assert_eq!(eval(&mut mt, &taken_yes), Ok(one));

    let taken_no = Expr::Conditional(Box::new(Expr::Const(empty)),
        detonate(), Box::new(Expr::Const(empty)));
    assert_eq!(eval(&mut mt, &taken_no), Ok(empty));

    assert!(mt.exception_occurred().is_none());
}

#[test]
fn conditional_propagates_failing_condition() {
    let mut mt = Mutator::new(Cfg::default());

    let r#type = Type::builder("explosive").nonzero(explode).build(&mut mt);
    let bomb = mt.alloc(r#type, Payload::Unit);
    let one = verity::builtins::int(&mut mt, 1);

    let expr = Expr::Conditional(Box::new(Expr::Const(bomb)),
        Box::new(Expr::Const(one)), Box::new(Expr::Const(one)));
    let err = eval(&mut mt, &expr).unwrap_err();

    assert_eq!(err.type_name, "explosive");
    assert_eq!(mt.take_exception().map(|exn| exn.message), Some("boom".to_string()));
}

#[test]
fn conditional_from_source() {
    let mut mt = Mutator::new(Cfg::default());

    assert_eq!(eval_string(&mut mt, "'full' if [None] else 'empty'"), "'full'");
    assert_eq!(eval_string(&mut mt, "'full' if {} else 'empty'"), "'empty'");
    assert_eq!(eval_string(&mut mt, "not 1 if 0 else not 0"), "True");
}
