mod auth_gate;
