// Common test utilities for integration tests
//
// Helpers that read source text and run it through a fresh checker.

#![allow(dead_code)]

use tyl_typecheck::{Checker, Error, ErrorKind, Ty};

/// Checks `source` with a fresh default checker and returns the canonical
/// name of the last expression's type.
pub fn type_of(source: &str) -> String {
    let mut checker = Checker::new();
    match checker.check_source(source) {
        Ok(ty) => ty.name().to_string(),
        Err(err) => panic!("expected {source:?} to check, got: {err}"),
    }
}

/// Checks `source` with `checker`, returning the type.
pub fn check_with(checker: &mut Checker, source: &str) -> Ty {
    match checker.check_source(source) {
        Ok(ty) => ty,
        Err(err) => panic!("expected {source:?} to check, got: {err}"),
    }
}

/// Checks `source` with a fresh default checker and returns the kind of the
/// type error it must fail with.
pub fn error_kind(source: &str) -> ErrorKind {
    let mut checker = Checker::new();
    match checker.check_source(source) {
        Ok(ty) => panic!("expected {source:?} to fail, got type {ty}"),
        Err(Error::Read(err)) => panic!("expected a type error, got read error: {err}"),
        Err(Error::Type(err)) => err.kind(),
    }
}

/// The classic point hierarchy used by the class tests.
pub const POINTS: &str = r#"
(class Point null
  (begin
    (var x 0)
    (var y 0)
    (def constructor ((self Point) (x number) (y number)) -> Point
      (begin
        (set (prop self x) x)
        (set (prop self y) y)
        self))
    (def calc ((self Point)) -> number
      (+ (prop self x) (prop self y)))))

(class Point3D Point
  (begin
    (var z 0)
    (def constructor ((self Point3D) (x number) (y number) (z number)) -> Point3D
      (begin
        ((prop (super Point3D) constructor) self x y)
        (set (prop self z) z)
        self))
    (def calc ((self Point3D)) -> number
      (+ ((prop (super Point3D) calc) self) (prop self z)))))
"#;
