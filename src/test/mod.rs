use crate::{
    typesystem::{ClassBuilder, ClassRc, Instance, TypeRegistry},
    Result,
};

/// The reference hierarchy used across unit tests:
///
/// - `A` declares `foo = 42`
/// - `B(A)` declares `bar = "hello there"`
/// - `C` is empty
/// - `D(C, B)` declares `gaz = -1`
pub struct TypeHierarchy {
    pub registry: TypeRegistry,
    pub a: ClassRc,
    pub b: ClassRc,
    pub c: ClassRc,
    pub d: ClassRc,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::build().expect("reference hierarchy must register")
    }

    fn build() -> Result<Self> {
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

        Ok(TypeHierarchy {
            registry,
            a,
            b,
            c,
            d,
        })
    }

    pub fn instance_of_b(&self) -> Instance {
        Instance::new(&self.b).expect("B is concrete")
    }

    pub fn instance_of_d(&self) -> Instance {
        Instance::new(&self.d).expect("D is concrete")
    }
}
