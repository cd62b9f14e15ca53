//! Type model tests: equality across primitives, aliases, unions and
//! function signatures, observed through checked programs.

mod common;

use common::{check_with, error_kind, type_of};
use tyl_typecheck::{Checker, ErrorKind, Ty};

#[test]
fn test_primitive_equality() {
    assert!(Ty::NUMBER.equals(&Ty::NUMBER));
    assert!(!Ty::NUMBER.equals(&Ty::STRING));
}

#[test]
fn test_alias_is_interchangeable() {
    let src = r#"
        (type int number)
        (def inc ((x int)) -> int (+ x 1))
        (var (n number) (inc 41))
        (inc n)
    "#;
    assert_eq!(type_of(src), "int");
}

#[test]
fn test_alias_chain() {
    let mut checker = Checker::new();
    check_with(&mut checker, "(type int number) (type ID int)");

    let id = checker.lookup_type("ID").unwrap();
    assert!(id.equals(&Ty::NUMBER));
    assert!(Ty::NUMBER.equals(id));
    assert!(!id.equals(&Ty::STRING));
}

#[test]
fn test_alias_to_function_type() {
    let src = r#"
        (type Unary Fn<number<number>>)
        (def twice ((f Unary) (x number)) -> number (f (f x)))
        (twice square 3)
    "#;
    assert_eq!(type_of(src), "number");
}

#[test]
fn test_union_membership() {
    let mut checker = Checker::new();
    check_with(&mut checker, "(type NumOrStr (or number string))");

    let union = checker.lookup_type("NumOrStr").unwrap().clone();
    assert!(Ty::NUMBER.equals(&union));
    assert!(union.equals(&Ty::STRING));
    assert!(!Ty::BOOLEAN.equals(&union));

    let src = r#"
        (def show ((x NumOrStr)) -> string "shown")
        (show 1)
        (show "a")
    "#;
    assert_eq!(check_with(&mut checker, src).name(), "string");
    assert_eq!(
        checker
            .check_source("(show true)")
            .unwrap_err()
            .as_type_error()
            .map(|e| e.kind()),
        Some(ErrorKind::TypeMismatch)
    );
}

#[test]
fn test_union_equality_needs_exact_options() {
    let mut checker = Checker::new();
    check_with(
        &mut checker,
        r#"
        (type A (or number string))
        (type B (or string number))
        (type C (or number string boolean))
        "#,
    );

    let a = checker.lookup_type("A").unwrap();
    let b = checker.lookup_type("B").unwrap();
    let c = checker.lookup_type("C").unwrap();
    assert!(a.equals(b));
    assert!(!a.equals(c));
    assert!(!c.equals(a));
}

#[test]
fn test_function_structural_equality() {
    let src = r#"
        (var (f Fn<number<number,number>>) sum)
        (var (g Fn<number<number,number>>) f)
        g
    "#;
    assert_eq!(type_of(src), "Fn<number<number,number>>");

    assert_eq!(
        error_kind("(var (f Fn<number<number>>) sum)"),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_function_type_as_parameter() {
    let mut checker = Checker::new();
    let ty = check_with(&mut checker, "(lambda ((f Fn<number<number,number>>)) -> number (f 1 2))");
    assert_eq!(ty.name(), "Fn<number<Fn<number<number,number>>>>");
}
