pub mod surface_fixup;
