pub mod support;

#[cfg(test)]
mod lifecycle;
#[cfg(test)]
mod persistence;
#[cfg(test)]
mod pipeline;
