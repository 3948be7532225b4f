pub mod test_rbf;
