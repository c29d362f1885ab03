//! Ground queries used to plant feet.
//!
//! The crate does not ship a ray caster. Hosts implement [`GroundQuery`] on
//! top of whatever collision world they have.

mod ray;

pub use ray::{GroundHit, Ray};

pub trait GroundQuery {
    /// Nearest surface hit along `ray`, if any.
    fn cast(&self, ray: &Ray) -> Option<GroundHit>;
}

impl<T: GroundQuery + ?Sized> GroundQuery for &T {
    fn cast(&self, ray: &Ray) -> Option<GroundHit> {
        (**self).cast(ray)
    }
}
