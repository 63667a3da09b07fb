pub(crate) mod y4m;
