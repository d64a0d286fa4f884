//! The content model a property contributes to the complex type of its bean, described in the
//! vocabulary of XSD particles (pt. 1, §3.8 and §3.9).

use std::fmt;

use crate::{types::TypeRef, xstypes::QName};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Unbounded,
    Count(u64),
}

impl MaxOccurs {
    pub(crate) fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Unbounded, _) | (_, Self::Unbounded) => Self::Unbounded,
            (Self::Count(a), Self::Count(b)) => Self::Count(a + b),
        }
    }

    pub(crate) fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Count(0), _) | (_, Self::Count(0)) => Self::Count(0),
            (Self::Unbounded, _) | (_, Self::Unbounded) => Self::Unbounded,
            (Self::Count(a), Self::Count(b)) => Self::Count(a * b),
        }
    }

    pub(crate) fn max(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Unbounded, _) | (_, Self::Unbounded) => Self::Unbounded,
            (Self::Count(a), Self::Count(b)) => Self::Count((*a).max(*b)),
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compositor {
    Choice,
    Sequence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelGroup {
    pub compositor: Compositor,
    pub particles: Vec<Particle>,
}

/// Content of an element particle: a named type, or an anonymous complex type holding a nested
/// particle (used for wrapper elements).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementContent {
    Type(TypeRef),
    Anonymous(Box<Particle>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementParticle {
    pub name: QName,
    pub content: ElementContent,
    pub nillable: bool,
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Element(ElementParticle),
    ModelGroup(ModelGroup),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Particle {
    pub min_occurs: u64,
    pub max_occurs: MaxOccurs,
    pub term: Term,
}

impl Particle {
    pub fn element(min_occurs: u64, max_occurs: MaxOccurs, element: ElementParticle) -> Self {
        Self {
            min_occurs,
            max_occurs,
            term: Term::Element(element),
        }
    }

    pub fn group(
        min_occurs: u64,
        max_occurs: MaxOccurs,
        compositor: Compositor,
        particles: Vec<Particle>,
    ) -> Self {
        Self {
            min_occurs,
            max_occurs,
            term: Term::ModelGroup(ModelGroup {
                compositor,
                particles,
            }),
        }
    }

    /// Schema Component Constraint: Particle Emptiable
    ///
    /// <https://www.w3.org/TR/xmlschema11-1/#cos-group-emptiable>
    pub fn is_emptiable(&self) -> bool {
        self.effective_total_range().0 == 0
    }

    /// Schema Component Constraint: Effective Total Range. Element particles report their own
    /// occurrence range.
    pub fn effective_total_range(&self) -> (u64, MaxOccurs) {
        let Term::ModelGroup(group) = &self.term else {
            return (self.min_occurs, self.max_occurs);
        };

        let ranges = group.particles.iter().map(Particle::effective_total_range);
        let (min, max) = match group.compositor {
            // Pt. 1, 3.8.6.5 Effective Total Range (all and sequence)
            Compositor::Sequence => ranges.fold((0, MaxOccurs::Count(0)), |(min, max), r| {
                (min + r.0, max.add(&r.1))
            }),
            // Pt. 1, 3.8.6.6 Effective Total Range (choice)
            Compositor::Choice => ranges
                .reduce(|(min, max), r| (min.min(r.0), max.max(&r.1)))
                .unwrap_or((0, MaxOccurs::Count(0))),
        };
        (self.min_occurs * min, self.max_occurs.mul(&max))
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let range = format!("[{}..{}]", self.min_occurs, self.max_occurs);
        match &self.term {
            Term::Element(element) => {
                write!(f, "{indent}element {} {range}", element.name)?;
                if element.nillable {
                    write!(f, " nillable")?;
                }
                if let Some(default_value) = &element.default_value {
                    write!(f, " default={default_value:?}")?;
                }
                match &element.content {
                    ElementContent::Type(type_) => writeln!(f, ": {type_}"),
                    ElementContent::Anonymous(inner) => {
                        writeln!(f)?;
                        inner.write_indented(f, depth + 1)
                    }
                }
            }
            Term::ModelGroup(group) => {
                let compositor = match group.compositor {
                    Compositor::Choice => "choice",
                    Compositor::Sequence => "sequence",
                };
                writeln!(f, "{indent}{compositor} {range}")?;
                for particle in &group.particles {
                    particle.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinType;

    fn element(name: &str, type_: BuiltinType) -> Particle {
        Particle::element(
            1,
            MaxOccurs::Count(1),
            ElementParticle {
                name: QName::local(name),
                content: ElementContent::Type(type_.into()),
                nillable: false,
                default_value: None,
            },
        )
    }

    #[test]
    fn unbounded_choice_range() {
        let choice = Particle::group(
            0,
            MaxOccurs::Unbounded,
            Compositor::Choice,
            vec![element("A", BuiltinType::Int), element("B", BuiltinType::Float)],
        );
        assert_eq!(choice.effective_total_range(), (0, MaxOccurs::Unbounded));
        assert!(choice.is_emptiable());
    }

    #[test]
    fn sequence_range_adds_up() {
        let sequence = Particle::group(
            1,
            MaxOccurs::Count(2),
            Compositor::Sequence,
            vec![element("A", BuiltinType::Int), element("B", BuiltinType::Float)],
        );
        assert_eq!(sequence.effective_total_range(), (2, MaxOccurs::Count(4)));
        assert!(!sequence.is_emptiable());
    }

    #[test]
    fn choice_minimum_is_smallest_branch() {
        let optional = Particle {
            min_occurs: 0,
            ..element("B", BuiltinType::Float)
        };
        let choice = Particle::group(
            1,
            MaxOccurs::Count(1),
            Compositor::Choice,
            vec![element("A", BuiltinType::Int), optional],
        );
        assert_eq!(choice.effective_total_range(), (0, MaxOccurs::Count(1)));
    }

    #[test]
    fn display_lists_particles_in_order() {
        let choice = Particle::group(
            0,
            MaxOccurs::Unbounded,
            Compositor::Choice,
            vec![element("A", BuiltinType::Int), element("B", BuiltinType::Float)],
        );
        assert_eq!(
            choice.to_string(),
            "choice [0..unbounded]\n  element A [1..1]: xs:int\n  element B [1..1]: xs:float\n"
        );
    }
}
