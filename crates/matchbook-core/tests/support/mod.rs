pub mod reconcile_testkit;
