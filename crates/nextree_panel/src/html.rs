use anyhow::Result;
use nextree_tree::SerializedTree;

const D3_SCRIPT_URL: &str = "https://d3js.org/d3.v7.min.js";

const STYLE: &str = r#"
body{font-family:system-ui,-apple-system,Segoe UI,Helvetica,Arial,sans-serif;margin:16px;}
header{display:flex;align-items:center;gap:12px;margin-bottom:8px;}
select{font-size:14px;padding:2px 6px;}
.legend{display:flex;gap:12px;font-size:12px;color:#555;}
.legend-dot{width:10px;height:10px;border-radius:50%;display:inline-block;margin-right:4px;}
.error{color:#b00020;font-family:monospace;white-space:pre-wrap;}
.node rect{stroke:#666;stroke-width:1px;rx:4;}
.node.client rect{fill:#fff3c4;}
.node.server rect{fill:#d7f5dd;}
.node.unknown rect{fill:#eee;stroke-dasharray:3 2;}
.node text{font:11px sans-serif;}
.link{fill:none;stroke:#ccc;stroke-width:2px;}
"#;

// Posts the selected route back to the host; outside an editor webview the
// message is logged so a driving process can pick it up from the console.
const SCRIPT: &str = r##"
(function () {
  var host = typeof acquireVsCodeApi === "function" ? acquireVsCodeApi() : null;
  document.querySelector("#route-select").addEventListener("change", function (event) {
    var message = { command: "change-route", route: event.target.value };
    if (host) { host.postMessage(message); } else { console.log(JSON.stringify(message)); }
  });

  var data = JSON.parse(document.querySelector("#tree-data").textContent);
  if (!data) { return; }

  var root = d3.hierarchy(data, function (d) { return d.children; });
  var nodeWidth = 160, nodeHeight = 90;
  d3.tree().nodeSize([nodeWidth, nodeHeight])(root);

  var minX = d3.min(root.descendants(), function (d) { return d.x; });
  var maxX = d3.max(root.descendants(), function (d) { return d.x; });
  var margin = { top: 20, right: nodeWidth, bottom: 40, left: nodeWidth };
  var width = maxX - minX + margin.left + margin.right;
  var height = (root.height + 1) * nodeHeight + margin.top + margin.bottom;

  var svg = d3.select("#tree")
    .append("svg")
    .attr("width", width)
    .attr("height", height)
    .append("g")
    .attr("transform", "translate(" + (margin.left - minX) + "," + margin.top + ")");

  svg.selectAll(".link")
    .data(root.descendants().slice(1))
    .enter()
    .append("path")
    .attr("class", "link")
    .attr("d", function (d) {
      var midY = (d.y + d.parent.y) / 2;
      return "M" + d.x + "," + d.y +
        "C" + d.x + "," + midY +
        " " + d.parent.x + "," + midY +
        " " + d.parent.x + "," + d.parent.y;
    });

  var node = svg.selectAll(".node")
    .data(root.descendants())
    .enter()
    .append("g")
    .attr("class", function (d) { return "node " + (d.data.componentType || "unknown"); })
    .attr("transform", function (d) { return "translate(" + d.x + "," + d.y + ")"; });

  node.append("title").text(function (d) { return d.data.path || d.data.name; });
  node.append("rect").attr("width", 140).attr("height", 36).attr("x", -70).attr("y", -12);
  node.append("text")
    .attr("dy", "0.35em")
    .attr("text-anchor", "middle")
    .text(function (d) { return d.data.name + (d.data.cycle ? " (cycle)" : ""); });
  node.append("text")
    .attr("dy", "1.6em")
    .attr("text-anchor", "middle")
    .text(function (d) { return d.data.componentType || ""; });
})();
"##;

pub(crate) fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Serializes `value` for embedding inside a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Generates the complete panel document for `current_route`.
///
/// `tree` is `None` when the route's tree could not be built, in which case
/// `error` is shown instead of the diagram.
pub fn render_page<'r>(
    current_route: &str,
    routes: impl IntoIterator<Item = &'r str>,
    tree: Option<&SerializedTree>,
    error: Option<&str>,
) -> Result<String> {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\" />\n");
    out.push_str("<title>Route component tree</title>\n");
    out.push_str(&format!("<script src=\"{}\"></script>\n", D3_SCRIPT_URL));
    out.push_str("<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n<header>\n");

    out.push_str("<select id=\"route-select\" name=\"route\">\n");
    for route in routes {
        let selected = if route == current_route { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(route),
            selected,
            escape_html(route)
        ));
    }
    out.push_str("</select>\n");
    out.push_str(
        "<div class=\"legend\">\
<span><span class=\"legend-dot\" style=\"background:#fff3c4\"></span>client</span>\
<span><span class=\"legend-dot\" style=\"background:#d7f5dd\"></span>server</span></div>\n",
    );
    out.push_str("</header>\n");

    out.push_str(&format!("<p>Current route: <code>{}</code></p>\n", escape_html(current_route)));
    if let Some(error) = error {
        out.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }
    out.push_str("<div id=\"tree\"></div>\n");

    out.push_str("<script id=\"tree-data\" type=\"application/json\">");
    out.push_str(&script_json(&tree)?);
    out.push_str("</script>\n<script>");
    out.push_str(SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    Ok(out)
}
