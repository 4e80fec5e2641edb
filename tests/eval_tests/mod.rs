mod properties_test;
mod rule_test;
