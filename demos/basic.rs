//! Basic example of the sanduq container.

use sanduq::prelude::*;

// === Define your types ===

struct Config {
    database_url: String,
    debug: bool,
}

struct Database {
    url: String,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        format!("[{}] results for `{sql}`", self.url)
    }
}

fn main() -> Result<()> {
    let mut container = Container::new();

    // A singleton: built once on first resolution, then cached.
    container.bind_singleton("config", |_| {
        println!("(building config)");
        Ok(Config {
            database_url: String::from("postgres://localhost"),
            debug: true,
        })
    });

    // A plain factory: rebuilt on every resolution, and free to resolve
    // other entries through the container parameter.
    container.bind_factory("db", |c: &Container| {
        let config = c.get::<Config>("config")?;
        Ok(Database {
            url: config.database_url.clone(),
        })
    });

    // Decorate an existing entry without touching its definition.
    container.extend("db", |inner, c| {
        let config = c.get::<Config>("config")?;
        if config.debug {
            if let Some(db) = inner.downcast_ref::<Database>() {
                println!("(resolved db at {})", db.url);
            }
        }
        Ok(inner)
    })?;

    // A protected factory: resolving it hands the closure back unexecuted.
    container.protect("on_shutdown", |_| Ok(String::from("flushed")));

    let db = container.get::<Database>("db")?;
    println!("{}", db.query("SELECT 1"));

    let hook = container.factory("on_shutdown")?;
    let outcome = hook(&container)?;
    println!("shutdown hook says: {:?}", outcome.downcast::<String>().ok());

    Ok(())
}
