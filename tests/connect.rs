use std::cell::RefCell;

use jdbc_dialect::{
    BoxDynError, ColumnSource, ConnectConfig, ConnectionDescriptor, Connector, Dialect, Error,
    RawColumn, SqlType, Value,
};

#[derive(Default)]
struct MockLoader {
    loaded: RefCell<Vec<&'static str>>,
    missing: bool,
}

impl jdbc_dialect::DriverLoader for MockLoader {
    fn load_driver(&self, dialect: &Dialect) -> Result<(), BoxDynError> {
        if self.missing {
            return Err(format!("{} not on the class path", dialect.defaults.driver_class).into());
        }

        self.loaded.borrow_mut().push(dialect.name);
        Ok(())
    }
}

/// Opens "connections" that can only describe one table.
#[derive(Default)]
struct MockConnector {
    opened: Vec<String>,
}

#[derive(Debug)]
struct MockConnection;

impl Connector for MockConnector {
    type Connection = MockConnection;

    fn open_jdbc_connection(
        &mut self,
        target: &ConnectionDescriptor,
    ) -> Result<MockConnection, BoxDynError> {
        let url = target.get_url().ok_or("no url")?;
        self.opened.push(url.to_owned());
        Ok(MockConnection)
    }

    fn open_naming_service_connection(
        &mut self,
        target: &ConnectionDescriptor,
    ) -> Result<MockConnection, BoxDynError> {
        let name = target.get_jndi().ok_or("no naming-service name")?;
        self.opened.push(name.to_owned());
        Ok(MockConnection)
    }
}

impl ColumnSource for MockConnection {
    fn raw_columns(&mut self, table: &str) -> Result<Vec<RawColumn>, BoxDynError> {
        if table != "EMPLOYEE" {
            return Err(format!("table {table} does not exist").into());
        }

        Ok(vec![
            RawColumn::new("EMP_NO", SqlType::SMALLINT).nullable(false),
            RawColumn::new("FIRST_NAME", SqlType::VARCHAR)
                .type_name("VARCHAR(15)")
                .raw_default("DEFAULT 'N/A'"),
            RawColumn::new("NOTES", SqlType::LONGVARCHAR).type_name("BLOB SUB_TYPE TEXT"),
        ])
    }
}

#[test]
fn it_loads_the_driver_and_opens_the_url() -> anyhow::Result<()> {
    let loader = MockLoader::default();
    let mut connector = MockConnector::default();

    let connected = jdbc_dialect::firebird_connection(
        ConnectConfig::new().database("employee"),
        &loader,
        &mut connector,
    )?;

    assert_eq!(*loader.loaded.borrow(), ["firebird"]);
    assert_eq!(connector.opened, ["jdbc:firebirdsql://localhost:3050/employee"]);
    assert_eq!(
        connected.target.get_driver_class_name(),
        Some("org.firebirdsql.jdbc.FBDriver")
    );

    Ok(())
}

#[test]
fn it_routes_naming_services_without_loading_the_driver() -> anyhow::Result<()> {
    let loader = MockLoader {
        missing: true,
        ..MockLoader::default()
    };
    let mut connector = MockConnector::default();

    let connected = jdbc_dialect::firebird_connection(
        ConnectConfig::new().jndi("java:comp/env/jdbc/employee"),
        &loader,
        &mut connector,
    )?;

    assert!(loader.loaded.borrow().is_empty());
    assert_eq!(connector.opened, ["java:comp/env/jdbc/employee"]);
    assert_eq!(connected.target.get_port(), None);

    Ok(())
}

#[test]
fn it_reports_a_missing_driver() {
    let loader = MockLoader {
        missing: true,
        ..MockLoader::default()
    };
    let mut connector = MockConnector::default();

    let err = jdbc_dialect::firebird_connection(
        ConnectConfig::new().database("employee"),
        &loader,
        &mut connector,
    )
    .unwrap_err();

    assert!(matches!(err, Error::DriverLoad { .. }), "{err}");
    assert!(connector.opened.is_empty());
}

#[test]
fn it_introspects_a_table_over_the_connection() -> anyhow::Result<()> {
    jdbc_dialect::install_default_dialects()?;

    let mut connected = jdbc_dialect::connect_to_target(
        ConnectConfig::new().adapter("firebird").database("employee"),
        &MockLoader::default(),
        &mut MockConnector::default(),
    )?;

    let context = connected.context();
    let factory = jdbc_dialect::ColumnFactory::global()?;
    let columns = factory.introspect_table(&context, &mut connected.raw, "EMPLOYEE")?;

    assert_eq!(columns.len(), 3);
    assert!(!columns[0].nullable());
    assert_eq!(columns[1].default(), &Value::Text("N/A".into()));
    assert_eq!(columns[2].sql_type(), SqlType::CLOB);

    let err = factory
        .introspect_table(&context, &mut connected.raw, "PROJECT")
        .unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "{err}");

    Ok(())
}
