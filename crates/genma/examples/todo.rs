//! Todo list demo
//!
//! Run with `RUST_LOG=debug cargo run -p genma --example todo`.

use std::time::{Duration, Instant};

use anyhow::Result;
use genma::{click_outside, html, Debounce, Dom, EventListener, Wire};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
<body>
  <form id="add">
    <input id="title" type="text">
    <button id="submit" type="submit">Add</button>
  </form>
  <ul id="todos"></ul>
  <div id="popup" class="open">Options</div>
  <p id="status"></p>
</body>
</html>
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dom = Dom::parse(PAGE);

    let view = dom.clone();
    let mut todos = Wire::with_callback(Vec::<String>::new(), move |items: &Vec<String>| {
        view.select("#todos")
            .render_list(items, |item, i| html!("<li data-index=\"{}\">{}</li>", i, item));
        view.select("#status").set_text(&format!("{} items", items.len()));
    });

    let popup = dom.downgrade();
    let _outside = click_outside(&dom, "#popup", move |_| {
        if let Some(dom) = popup.upgrade() {
            dom.select("#popup").remove_class("open");
        }
    });

    let submit_log = EventListener::new(|e| tracing::info!("submit from {:?}", e.target()));
    dom.select("#submit").on("click", &submit_log);

    for title in ["Buy milk", "<script>alert(1)</script>"] {
        dom.select("#title").set_val(title);
        dom.select("#submit").trigger("click");
        if let Some(value) = dom.select("#title").val() {
            todos.mutate(|items| items.push(value));
        }
    }

    let mut search = Debounce::new(Duration::from_millis(300), |query: String| {
        tracing::info!("searching for '{}'", query);
    });
    let start = Instant::now();
    for (offset, query) in [(0, "b"), (100, "bu"), (200, "buy")] {
        search.call_at(start + Duration::from_millis(offset), query.to_string());
    }
    search.tick_at(start + Duration::from_millis(500));

    println!("{}", dom.try_select("#todos")?.html().unwrap_or_default());
    println!("{}", dom.select("#status").text().unwrap_or_default());
    println!("popup open: {}", dom.select("#popup").has_class("open"));

    Ok(())
}
