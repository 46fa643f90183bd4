pub mod ipmi_client;
