//! Integration tests for class-scoped constants.
//!
//! These tests drive the public API end to end: types are defined through a registry,
//! read through the type and through instances, and every write or delete of a constant
//! is checked for the exact error it produces.

use typeconst::{prelude::*, Member, DEFAULT_DECLARATION_KEY};

/// The reference hierarchy: `A(foo)`, `B(A; bar)`, empty `C`, `D(C, B; gaz)`.
fn reference_hierarchy() -> Result<(TypeRegistry, ClassRc, ClassRc, ClassRc, ClassRc)> {
    let registry = TypeRegistry::new();
    let a = ClassBuilder::new("A").constant("foo", 42).build(&registry)?;
    let b = ClassBuilder::new("B")
        .base(&a)
        .constant("bar", "hello there")
        .build(&registry)?;
    let c = ClassBuilder::new("C").build(&registry)?;
    let d = ClassBuilder::new("D")
        .bases(&[c.clone(), b.clone()])
        .constant("gaz", -1)
        .build(&registry)?;
    Ok((registry, a, b, c, d))
}

#[test]
fn test_constant_readable_on_type_and_instance() -> Result<()> {
    let (_registry, a, ..) = reference_hierarchy()?;

    assert_eq!(a.get_attr("foo")?, Value::I4(42));
    let obj = Instance::new(&a)?;
    assert_eq!(obj.get_attr("foo")?, Value::I4(42));
    Ok(())
}

#[test]
fn test_published_names_merge_across_bases() -> Result<()> {
    let (_registry, a, b, c, d) = reference_hierarchy()?;

    assert_eq!(a.constants(), &["foo"]);
    assert_eq!(b.constants(), &["foo", "bar"]);
    assert!(c.constants().is_empty());
    assert_eq!(d.constants(), &["foo", "bar", "gaz"]);
    assert_eq!(d.mro_names(), vec!["D", "C", "B", "A"]);
    Ok(())
}

#[test]
fn test_inherited_constant_reads() -> Result<()> {
    let (_registry, _a, _b, _c, d) = reference_hierarchy()?;
    let obj = Instance::new(&d)?;

    assert_eq!(obj.get_attr("bar")?, Value::from("hello there"));
    assert_eq!(d.get_attr("bar")?, Value::from("hello there"));
    assert_eq!(obj.get_attr("foo")?, Value::I4(42));
    assert_eq!(obj.get_attr("gaz")?, Value::I4(-1));
    Ok(())
}

#[test]
fn test_modify_messages() -> Result<()> {
    let (_registry, _a, _b, _c, d) = reference_hierarchy()?;
    let obj = Instance::new(&d)?;

    let err = obj.set_attr("bar", "hello".into()).unwrap_err();
    assert!(matches!(err, Error::ImmutableModify { .. }));
    assert_eq!(
        err.to_string(),
        "constant 'bar' of 'D' object cannot be modified."
    );

    let err = d.set_attr("bar", "hello".into()).unwrap_err();
    assert!(matches!(err, Error::ImmutableModify { .. }));
    assert_eq!(err.to_string(), "Cannot modify constant 'D.bar'.");

    assert_eq!(obj.get_attr("bar")?, Value::from("hello there"));
    Ok(())
}

#[test]
fn test_delete_messages() -> Result<()> {
    let (_registry, _a, _b, _c, d) = reference_hierarchy()?;
    let obj = Instance::new(&d)?;

    let err = obj.del_attr("gaz").unwrap_err();
    assert!(matches!(err, Error::ImmutableDelete { .. }));
    assert_eq!(
        err.to_string(),
        "constant 'gaz' of 'D' object cannot be deleted."
    );

    let err = d.del_attr("gaz").unwrap_err();
    assert!(matches!(err, Error::ImmutableDelete { .. }));
    assert_eq!(err.to_string(), "Cannot delete constant 'D.gaz'.");

    assert_eq!(d.get_attr("gaz")?, Value::I4(-1));
    Ok(())
}

#[test]
fn test_storage_injection_does_not_shadow() -> Result<()> {
    let (_registry, _a, _b, _c, d) = reference_hierarchy()?;
    let obj = Instance::new(&d)?;

    obj.storage().insert("bar", "hello");
    assert_eq!(obj.get_attr("bar")?, Value::from("hello there"));
    assert_eq!(obj.storage().get("bar"), Some(Value::from("hello")));
    Ok(())
}

/// Every constant name of every type in the hierarchy rejects every mutation path.
#[test]
fn test_no_mutation_path_succeeds() -> Result<()> {
    let (registry, ..) = reference_hierarchy()?;

    for class in registry.iter() {
        let obj = Instance::new(&class)?;
        for name in class.constants().iter() {
            let before = class.get_attr(name)?;

            assert!(obj.set_attr(name, Value::None).unwrap_err().is_immutable());
            assert!(obj.del_attr(name).unwrap_err().is_immutable());
            assert!(class.set_attr(name, Value::None).unwrap_err().is_immutable());
            assert!(class.del_attr(name).unwrap_err().is_immutable());

            assert_eq!(class.get_attr(name)?, before);
            assert_eq!(obj.get_attr(name)?, before);
        }
    }
    Ok(())
}

/// Type-level writes and deletes fail for every published name, including one that a
/// subclass covers with a plain attribute. Instances follow attribute resolution, so only
/// names that resolve to a slot are rejected there.
#[test]
fn test_no_type_mutation_path_succeeds_with_plain_shadow() -> Result<()> {
    let (registry, a, ..) = reference_hierarchy()?;
    let shadow = ClassBuilder::new("Shadow")
        .base(&a)
        .attr("foo", 7)
        .constant("kind", "shadow")
        .build(&registry)?;
    let leaf = ClassBuilder::new("Leaf").base(&shadow).build(&registry)?;

    for class in [&a, &shadow, &leaf] {
        let obj = Instance::new(class)?;
        for name in class.constants().iter() {
            let before = class.get_attr(name)?;

            assert!(class.is_constant(name));
            assert!(class.set_attr(name, Value::None).unwrap_err().is_immutable());
            assert!(class.del_attr(name).unwrap_err().is_immutable());
            assert_eq!(class.get_attr(name)?, before);

            if class.lookup_constant(name).is_some() {
                assert!(obj.set_attr(name, Value::None).unwrap_err().is_immutable());
                assert!(obj.del_attr(name).unwrap_err().is_immutable());
                assert_eq!(obj.get_attr(name)?, before);
            }
        }
    }

    let err = leaf.set_attr("foo", 1.into()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot modify constant 'Leaf.foo'.");
    let err = shadow.del_attr("foo").unwrap_err();
    assert_eq!(err.to_string(), "Cannot delete constant 'Shadow.foo'.");
    assert_eq!(leaf.get_attr("foo")?, Value::I4(7));
    assert_eq!(a.get_attr("foo")?, Value::I4(42));
    Ok(())
}

#[test]
fn test_ancestor_names_are_published_on_descendants() -> Result<()> {
    let (registry, ..) = reference_hierarchy()?;

    for class in registry.iter() {
        for ancestor in class.ancestors() {
            assert!(class.constants().is_superset(ancestor.constants()));
            for name in ancestor.own_constants() {
                assert!(class.constants().contains(&name));
            }
        }
    }
    Ok(())
}

#[test]
fn test_redeclaration_shadows_without_touching_ancestor() -> Result<()> {
    let (registry, a, _b, _c, d) = reference_hierarchy()?;
    let e = ClassBuilder::new("E")
        .base(&d)
        .constant("foo", 7)
        .build(&registry)?;

    assert_eq!(e.get_attr("foo")?, Value::I4(7));
    assert_eq!(Instance::new(&e)?.get_attr("foo")?, Value::I4(7));
    assert_eq!(a.get_attr("foo")?, Value::I4(42));
    assert_eq!(d.get_attr("foo")?, Value::I4(42));
    assert_eq!(e.constants(), d.constants());

    let err = e.set_attr("foo", 1.into()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot modify constant 'E.foo'.");
    Ok(())
}

#[test]
fn test_ordinary_attributes_stay_mutable() -> Result<()> {
    let registry = TypeRegistry::new();
    let agent = ClassBuilder::new("Agent")
        .constant("kind", "household")
        .attr("wealth", 100)
        .build(&registry)?;

    agent.set_attr("wealth", 250.into())?;
    assert_eq!(agent.get_attr("wealth")?, Value::I4(250));
    agent.del_attr("wealth")?;
    assert!(matches!(
        agent.get_attr("wealth"),
        Err(Error::AttributeNotFound { .. })
    ));

    let obj = Instance::with_attrs(&agent, [("wealth", 10)])?;
    obj.set_attr("wealth", 11.into())?;
    assert_eq!(obj.get_attr("wealth")?, Value::I4(11));
    obj.del_attr("wealth")?;
    assert!(!obj.has_attr("wealth"));
    Ok(())
}

/// A plain value and a computed slot declared side by side.
#[test]
#[allow(clippy::approx_constant)]
fn test_captured_and_computed_constants() -> Result<()> {
    let registry = TypeRegistry::new();

    let mut body = Namespace::new();
    body.insert("PI", 3.14159);
    body.insert_constant(
        "TAU",
        ConstantSlot::with_getter(|_| Value::R8(6.28318)).with_doc("full turn"),
    );
    body.declare_constants(["PI"]);
    let simple = registry.define("SimpleClass", &[], body)?;

    assert_eq!(simple.get_attr("PI")?, Value::R8(3.14159));
    assert_eq!(simple.get_attr("TAU")?, Value::R8(6.28318));

    let obj = Instance::new(&simple)?;
    assert_eq!(obj.get_attr("PI")?, Value::R8(3.14159));
    assert_eq!(obj.get_attr("TAU")?, Value::R8(6.28318));

    for name in ["PI", "TAU"] {
        assert!(simple.set_attr(name, 3.into()).is_err());
        assert!(obj.set_attr(name, 3.into()).is_err());
        assert!(simple.del_attr(name).is_err());
        assert!(obj.del_attr(name).is_err());
    }

    assert_eq!(simple.constants(), &["PI", "TAU"]);
    assert_eq!(
        simple.lookup_constant("TAU").and_then(|slot| slot.doc().map(str::to_string)),
        Some("full turn".to_string())
    );
    Ok(())
}

#[test]
fn test_getter_sees_reading_context() -> Result<()> {
    let registry = TypeRegistry::new();
    let base = ClassBuilder::new("Calendar")
        .constant_slot(
            "label",
            ConstantSlot::with_getter(|ctx| match ctx.instance() {
                Some(_) => Value::from(format!("instance of {}", ctx.class().name)),
                None => Value::from(ctx.class().name.clone()),
            }),
        )
        .build(&registry)?;
    let monthly = ClassBuilder::new("Monthly").base(&base).build(&registry)?;

    assert_eq!(base.get_attr("label")?, Value::from("Calendar"));
    assert_eq!(monthly.get_attr("label")?, Value::from("Monthly"));
    assert_eq!(
        Instance::new(&monthly)?.get_attr("label")?,
        Value::from("instance of Monthly")
    );
    Ok(())
}

#[test]
fn test_declaration_is_consumed() -> Result<()> {
    let registry = TypeRegistry::new();
    let mut body = Namespace::new();
    body.insert("code", "USD");
    body.declare_constants(["code"]);
    assert!(matches!(
        body.get(DEFAULT_DECLARATION_KEY),
        Some(Member::Value(Value::List(_)))
    ));

    let usd = registry.define("USD", &[], body)?;
    assert!(!usd.defines(DEFAULT_DECLARATION_KEY));
    assert!(usd.is_constant("code"));
    Ok(())
}

#[test]
fn test_strict_registration_rejects_undefined() {
    let registry = TypeRegistry::with_config(RegistrarConfig::strict());
    let err = ClassBuilder::new("Loan")
        .declare("loan_type")
        .build(&registry)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "constant 'Loan.loan_type' is declared but has no value"
    );
    assert!(registry.is_empty());
}

#[test]
fn test_inconsistent_bases_are_rejected() -> Result<()> {
    let (registry, a, b, ..) = reference_hierarchy()?;

    let err = ClassBuilder::new("X")
        .bases(&[a.clone(), b.clone()])
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, Error::InconsistentHierarchy(_)));

    let err = ClassBuilder::new("Y")
        .bases(&[a.clone(), a.clone()])
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateBase(_)));
    Ok(())
}

#[test]
fn test_constants_readable_across_threads() -> Result<()> {
    let (_registry, _a, _b, _c, d) = reference_hierarchy()?;
    let obj = Instance::new(&d)?;

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert_eq!(obj.get_attr("bar").unwrap(), Value::from("hello there"));
                    assert!(d.set_attr("gaz", 0.into()).is_err());
                }
            });
        }
    });
    Ok(())
}
