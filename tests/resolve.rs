use jdbc_dialect::{ConnectConfig, Error};

#[test]
fn it_resolves_firebird_defaults() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let target = jdbc_dialect::resolve_connection_target(
        ConnectConfig::new().adapter("firebird").database("x"),
    )?;

    assert_eq!(target.get_host(), Some("localhost"));
    assert_eq!(target.get_port(), Some(3050));
    assert_eq!(target.get_url(), Some("jdbc:firebirdsql://localhost:3050/x"));
    assert_eq!(
        target.get_driver_class_name(),
        Some("org.firebirdsql.jdbc.FBDriver")
    );
    assert_eq!(target.get_adapter_spec(), "firebird");

    Ok(())
}

#[test]
fn it_derives_urls_from_host_port_and_database() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let cases = [
        ("firebird", "firebirdsql", "fb.internal", 3051, "/data/employee.fdb"),
        ("postgres", "postgresql", "10.0.0.7", 6432, "app"),
        ("mariadb", "mysql", "db", 3307, "shop"),
    ];

    for (adapter, scheme, host, port, database) in cases {
        let config = ConnectConfig::new()
            .adapter(adapter)
            .host(host)
            .port(port)
            .database(database)
            .username("app")
            .password("secret")
            .dialect("custom-dialect")
            .property("connectTimeout", "10");

        let target = jdbc_dialect::resolve_connection_target(config)?;

        assert_eq!(
            target.get_url(),
            Some(&*format!("jdbc:{scheme}://{host}:{port}/{database}")),
            "{adapter}"
        );
        assert_eq!(target.get_host(), Some(host));
        assert_eq!(target.get_port(), Some(port));
        assert_eq!(target.get_database(), Some(database));
        assert_eq!(target.get_username(), Some("app"));
        assert_eq!(target.get_password(), Some("secret"));
        assert_eq!(target.get_dialect(), Some("custom-dialect"));
        assert_eq!(target.get_property("connectTimeout"), Some("10"));
    }

    Ok(())
}

#[test]
fn it_never_rewrites_an_explicit_url() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let urls = [
        "jdbc:firebirdsql://other:1/elsewhere?encoding=UTF8",
        "jdbc:firebirdsql:embedded:/tmp/test.fdb",
        "jdbc:postgresql://primary,replica/app?targetServerType=primary",
    ];

    for url in urls {
        // host, port and database disagree with the URL on purpose
        let config = ConnectConfig::new()
            .url(url)
            .host("ignored")
            .port(1)
            .database("ignored");

        let target = jdbc_dialect::resolve_connection_target(config)?;
        assert_eq!(target.get_url(), Some(url));
    }

    Ok(())
}

#[test]
fn it_selects_the_dialect_from_a_parsed_url() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let config: ConnectConfig = "jdbc:postgresql://db.example.com/app?sslmode=require".parse()?;
    let target = jdbc_dialect::resolve_connection_target(config)?;

    assert_eq!(target.get_adapter_spec(), "postgresql");
    assert_eq!(target.get_port(), Some(5432));
    assert_eq!(target.get_driver_class_name(), Some("org.postgresql.Driver"));
    assert_eq!(
        target.get_url(),
        Some("jdbc:postgresql://db.example.com/app?sslmode=require")
    );

    Ok(())
}

#[test]
fn it_leaves_the_port_unset_for_naming_services() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let config = ConnectConfig::from_pairs([
        ("adapter", "firebird"),
        ("jndi", "java:comp/env/jdbc/employee"),
    ])?;

    let target = jdbc_dialect::resolve_connection_target(config)?;

    assert!(target.is_naming_service());
    assert_eq!(target.get_port(), None);
    assert_eq!(target.get_host(), None);
    assert_eq!(target.get_url(), None);

    Ok(())
}

#[test]
fn it_reports_missing_databases_and_unknown_dialects() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let err = jdbc_dialect::resolve_connection_target(ConnectConfig::new().adapter("firebird"))
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err}");

    let err = jdbc_dialect::resolve_connection_target(
        ConnectConfig::new().adapter("informix").database("x"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err}");

    Ok(())
}
