
mod http_api_test;
mod signup_test;
