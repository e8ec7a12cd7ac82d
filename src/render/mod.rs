pub(crate) mod backend;
pub(crate) mod blur;
pub(crate) mod cpu;
pub(crate) mod surface;
