use axum::{
    http::header,
    response::{Html, IntoResponse},
};

/// Polling dashboard over the read endpoints.
///
/// Three tabs: room cards with per-node history charts, the latest network
/// health report, and recent alerts/errors. Everything refreshes every
/// `REFRESH_MS` in the browser; a failed fetch shows an inline message and the
/// next poll tries again.
pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AERIS – Mold Risk Dashboard</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.min.css">
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #00695c;
            --risk-0: #2e7d32;
            --risk-1: #ffa000;
            --risk-2: #d32f2f;
            --offline: #9e9e9e;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .container { max-width: 1200px; margin: 0 auto; padding: 1.5rem; }

        header {
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 1.5rem;
            flex-wrap: wrap;
            gap: 1rem;
        }
        h1 { font-size: 1.5rem; font-weight: 600; color: var(--accent); }
        h2 { font-size: 1rem; font-weight: 600; margin-bottom: 0.75rem; }
        .updated { font-size: 0.75rem; color: var(--muted); }

        .tabs { display: flex; gap: 0.5rem; margin-bottom: 1rem; border-bottom: 1px solid var(--border); }
        .tab-btn {
            padding: 0.5rem 1rem;
            border: none;
            border-bottom: 2px solid transparent;
            background: none;
            font-size: 0.875rem;
            cursor: pointer;
            color: var(--muted);
        }
        .tab-btn.active { color: var(--accent); border-bottom-color: var(--accent); }
        .tab { display: none; }
        .tab.active { display: block; }

        .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
        .card {
            padding: 1rem;
            border-radius: 0.75rem;
            color: white;
            min-height: 160px;
            cursor: pointer;
            outline: 3px solid transparent;
        }
        .card.selected { outline-color: var(--text); }
        .card h3 { font-size: 1.1rem; margin-bottom: 0.5rem; }
        .card p { font-size: 0.875rem; line-height: 1.5; }

        .panel {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            margin-bottom: 1rem;
        }
        .chart { margin-bottom: 1rem; }
        .chart-title { font-size: 0.875rem; color: var(--muted); margin-bottom: 0.25rem; }

        table { width: 100%; border-collapse: collapse; font-size: 0.8rem; }
        th, td { text-align: left; padding: 0.4rem 0.5rem; border-bottom: 1px solid var(--border); vertical-align: top; }
        th { color: var(--muted); font-weight: 500; }
        pre { font-size: 0.75rem; white-space: pre-wrap; word-break: break-word; }

        .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
        @media (max-width: 800px) { .columns { grid-template-columns: 1fr; } }

        .info { color: var(--muted); font-size: 0.875rem; padding: 0.5rem 0; }
        .error { color: var(--risk-2); font-size: 0.875rem; padding: 0.5rem 0; }

        .site-footer { margin-top: 2rem; font-size: 0.75rem; color: var(--muted); }
        .site-footer a { color: var(--muted); }
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>AERIS – Engineered for Purity</h1>
            <span class="updated" id="updated">--</span>
        </header>

        <nav class="tabs">
            <button class="tab-btn active" data-tab="overview">Environment Overview</button>
            <button class="tab-btn" data-tab="health">System Health</button>
            <button class="tab-btn" data-tab="events">Alerts &amp; Errors</button>
        </nav>

        <section class="tab active" id="tab-overview">
            <h2>Room Status</h2>
            <div class="cards" id="cards"><div class="info">Loading…</div></div>
            <div class="panel">
                <h2 id="history-title">History</h2>
                <div id="charts"><div class="info">Select a room to view its history.</div></div>
            </div>
        </section>

        <section class="tab" id="tab-health">
            <h2>System Health (Engineering View)</h2>
            <div class="panel" id="health"><div class="info">Loading…</div></div>
        </section>

        <section class="tab" id="tab-events">
            <div class="columns">
                <div class="panel">
                    <h2>Recent Alerts</h2>
                    <div id="alerts"><div class="info">Loading…</div></div>
                </div>
                <div class="panel">
                    <h2>Recent Errors</h2>
                    <div id="errors"><div class="info">Loading…</div></div>
                </div>
            </div>
        </section>

        <footer class="site-footer">
            <a href="/docs">API Docs</a>
        </footer>
    </div>

    <script src="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.iife.min.js"></script>
<script>
const REFRESH_MS = 5000;

const api = url => fetch(url).then(r => {
    if (!r.ok) throw new Error(`${r.status} ${r.statusText}`);
    return r.json();
});

const state = {
    selected: null,
    charts: [],
};

const escapeHtml = s => String(s ?? '').replace(/[&<>"']/g, c => (
    { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]
));

const fmt = (v, digits) => (typeof v === 'number' ? v.toFixed(digits) : '--');

function cardColor(node) {
    if (node.status === 'OFFLINE') return 'var(--offline)';
    if (node.risk_level === 2) return 'var(--risk-2)';
    if (node.risk_level === 1) return 'var(--risk-1)';
    return 'var(--risk-0)';
}

function showError(el, what, err) {
    el.innerHTML = `<div class="error">Failed to load ${what}: ${escapeHtml(err.message)}</div>`;
}

// Tabs
document.querySelectorAll('.tab-btn').forEach(btn => {
    btn.addEventListener('click', () => {
        document.querySelectorAll('.tab-btn').forEach(b => b.classList.remove('active'));
        document.querySelectorAll('.tab').forEach(t => t.classList.remove('active'));
        btn.classList.add('active');
        document.getElementById(`tab-${btn.dataset.tab}`).classList.add('active');
    });
});

async function loadOverview() {
    const el = document.getElementById('cards');
    let nodes;
    try {
        nodes = await api('/api/nodes/overview');
    } catch (err) {
        showError(el, 'overview', err);
        return;
    }

    if (!nodes.length) {
        el.innerHTML = '<div class="info">No node data available yet. Run the sample-feeder to generate data.</div>';
        return;
    }

    if (!state.selected || !nodes.some(n => n.node_id === state.selected)) {
        state.selected = nodes[0].node_id;
    }

    el.innerHTML = nodes.map(n => `
        <div class="card ${n.node_id === state.selected ? 'selected' : ''}"
             data-node="${escapeHtml(n.node_id)}" style="background:${cardColor(n)}">
            <h3>${escapeHtml(n.node_id)}</h3>
            <p><b>Status:</b> ${escapeHtml(n.status)}</p>
            <p><b>Mold Index:</b> ${fmt(n.mold_index, 2)}</p>
            <p><b>Temp:</b> ${fmt(n.temp_1, 1)} °C</p>
            <p><b>Humidity:</b> ${fmt(n.hum_1, 1)} %</p>
            <p><b>Sensors:</b> ${escapeHtml(n.drift_status)}</p>
        </div>
    `).join('');

    el.querySelectorAll('.card').forEach(card => {
        card.addEventListener('click', () => {
            state.selected = card.dataset.node;
            el.querySelectorAll('.card').forEach(c => c.classList.toggle('selected', c === card));
            loadHistory();
        });
    });

    await loadHistory();
}

function renderChart(container, title, timestamps, series) {
    const wrap = document.createElement('div');
    wrap.className = 'chart';
    wrap.innerHTML = `<div class="chart-title">${escapeHtml(title)}</div>`;
    container.appendChild(wrap);

    const colors = ['#2563eb', '#dc2626', '#16a34a'];
    const opts = {
        width: Math.max(container.clientWidth - 8, 300),
        height: 200,
        series: [{}].concat(series.map((s, i) => ({ label: s.label, stroke: colors[i % colors.length], width: 2 }))),
        axes: [{}, {}],
    };
    state.charts.push(new uPlot(opts, [timestamps, ...series.map(s => s.values)], wrap));
}

async function loadHistory() {
    const el = document.getElementById('charts');
    const node = state.selected;
    if (!node) return;
    document.getElementById('history-title').textContent = `History – ${node}`;

    let rows;
    try {
        rows = await api(`/api/data/history?node_id=${encodeURIComponent(node)}`);
    } catch (err) {
        showError(el, 'history', err);
        return;
    }

    state.charts.forEach(c => c.destroy());
    state.charts = [];
    el.innerHTML = '';

    if (!rows.length) {
        el.innerHTML = '<div class="info">No history yet for this node.</div>';
        return;
    }

    // uPlot wants unix seconds; rows arrive oldest first
    const ts = rows.map(r => Date.parse(r.timestamp) / 1000);
    const col = key => rows.map(r => r[key]);

    renderChart(el, `Temperature History – ${node}`, ts, [
        { label: 'temp_1', values: col('temp_1') },
        { label: 'temp_2', values: col('temp_2') },
    ]);
    renderChart(el, `Humidity History – ${node}`, ts, [
        { label: 'hum_1', values: col('hum_1') },
        { label: 'hum_2', values: col('hum_2') },
    ]);
    renderChart(el, `Mold Index Trend – ${node}`, ts, [
        { label: 'mold_index', values: col('mold_index') },
    ]);
}

async function loadHealth() {
    const el = document.getElementById('health');
    let report;
    try {
        report = await api('/api/health/latest');
    } catch (err) {
        showError(el, 'health', err);
        return;
    }

    if (!report.timestamp) {
        el.innerHTML = '<div class="info">No health report yet.</div>';
        return;
    }

    const nodes = Object.entries(report.nodes || {});
    const nodeRows = nodes.map(([id, info]) => `
        <tr><td>${escapeHtml(id)}</td><td>${escapeHtml(info?.status)}</td><td>${escapeHtml(info?.sensors)}</td></tr>
    `).join('');

    el.innerHTML = `
        <p class="info">Reported ${new Date(report.timestamp).toLocaleString()}</p>
        <h2>Network Status</h2>
        <pre>${escapeHtml(JSON.stringify(report.network || {}, null, 2))}</pre>
        <h2 style="margin-top:1rem">Nodes</h2>
        ${nodes.length
            ? `<table><thead><tr><th>node_id</th><th>status</th><th>sensors</th></tr></thead><tbody>${nodeRows}</tbody></table>`
            : '<div class="info">No nodes info in health report yet.</div>'}
    `;
}

function renderEventTable(el, rows, columns, emptyText) {
    if (!rows.length) {
        el.innerHTML = `<div class="info">${emptyText}</div>`;
        return;
    }
    const cell = v => (typeof v === 'object' && v !== null
        ? `<pre>${escapeHtml(JSON.stringify(v))}</pre>`
        : escapeHtml(v));
    el.innerHTML = `
        <table>
            <thead><tr>${columns.map(c => `<th>${c}</th>`).join('')}</tr></thead>
            <tbody>${rows.map(r => `<tr>${columns.map(c => `<td>${cell(r[c])}</td>`).join('')}</tr>`).join('')}</tbody>
        </table>`;
}

async function loadEvents() {
    const alertsEl = document.getElementById('alerts');
    const errorsEl = document.getElementById('errors');

    try {
        const alerts = await api('/api/alerts/recent');
        renderEventTable(alertsEl, alerts, ['timestamp', 'node_id', 'alert_level', 'message', 'metrics'], 'No alerts yet.');
    } catch (err) {
        showError(alertsEl, 'alerts', err);
    }

    try {
        const errors = await api('/api/errors/recent');
        renderEventTable(errorsEl, errors, ['timestamp', 'node_id', 'error_code', 'details'], 'No errors yet.');
    } catch (err) {
        showError(errorsEl, 'errors', err);
    }
}

async function refresh() {
    await Promise.all([loadOverview(), loadHealth(), loadEvents()]);
    document.getElementById('updated').textContent = `Updated ${new Date().toLocaleTimeString()}`;
}

refresh();
setInterval(refresh, REFRESH_MS);
</script>
</body>
</html>
"##;
