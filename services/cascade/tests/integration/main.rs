mod cascade_test;
mod helpers;
mod router_test;
mod sweep_test;
