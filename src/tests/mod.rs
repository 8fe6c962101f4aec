mod multiproof;
mod sha512;
