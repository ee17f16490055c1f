/// Embedded single-page front end for `provnav serve`

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>provnav</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }

        #trail {
            padding: 10px 20px;
            border-bottom: 1px solid #333;
            min-height: 42px;
        }

        #trail button {
            background: none;
            border: 1px solid #444;
            color: #00d9ff;
            border-radius: 4px;
            padding: 3px 8px;
            margin-right: 6px;
            cursor: pointer;
        }

        #error { color: #ff6b6b; margin-left: 12px; }

        svg { width: 100vw; height: calc(100vh - 42px); background: #16213e; }

        svg g { transition: opacity 250ms ease; }
        svg.leaving g.node:not(.focal) { opacity: 0; }

        .node rect { rx: 6; stroke: #333; stroke-width: 1; cursor: pointer; }
        .node.focal rect { fill: #00d9ff; }
        .node.data rect { fill: #4ecdc4; }
        .node.process rect { fill: #f7b267; }
        .node.placeholder rect { fill: #2a2a4a; stroke-dasharray: 4 3; }
        .node.came-from rect { stroke: #ff6b6b; stroke-width: 3; }
        .node text { fill: #111; font-size: 12px; pointer-events: none; }
        .node.placeholder text { fill: #aaa; }

        .edge { stroke: #555; stroke-width: 1.5; fill: none; }
        .edge-label { fill: #888; font-size: 10px; }
    </style>
</head>
<body>
    <div id="trail"><span id="error"></span></div>
    <svg id="canvas"></svg>

    <script>
        const W = 150, H = 34;
        const svg = document.getElementById('canvas');
        const NS = 'http://www.w3.org/2000/svg';

        function el(name, attrs, parent) {
            const e = document.createElementNS(NS, name);
            for (const [k, v] of Object.entries(attrs)) e.setAttribute(k, v);
            parent.appendChild(e);
            return e;
        }

        function nodeClass(n) {
            if (n.type === 'placeholder') return 'placeholder';
            if (n.type === 'focal') return 'focal';
            const cls = n.node.kind === 'data' ? 'data' : 'process';
            return n.came_from ? cls + ' came-from' : cls;
        }

        function label(n) {
            return n.type === 'placeholder' ? '+' + n.count + ' more' : n.node.label;
        }

        function draw(view) {
            svg.innerHTML = '';
            const byId = Object.fromEntries(view.nodes.map(n => [n.id, n]));
            const edges = el('g', {}, svg);
            for (const e of view.edges) {
                const s = byId[e.source], t = byId[e.target];
                if (!s || !t) continue;
                const x1 = s.position.x + W / 2, y1 = s.position.y;
                const x2 = t.position.x - W / 2, y2 = t.position.y;
                const mx = (x1 + x2) / 2;
                el('path', { class: 'edge', d: `M${x1},${y1} C${mx},${y1} ${mx},${y2} ${x2},${y2}` }, edges);
                const text = el('text', { class: 'edge-label', x: mx, y: (y1 + y2) / 2 - 4 }, edges);
                text.textContent = e.link_label;
            }
            for (const n of view.nodes) {
                const g = el('g', { class: 'node ' + nodeClass(n) }, svg);
                el('rect', { x: n.position.x - W / 2, y: n.position.y - H / 2, width: W, height: H }, g);
                const text = el('text', { x: n.position.x - W / 2 + 8, y: n.position.y + 4 }, g);
                text.textContent = label(n);
                g.addEventListener('click', () => select(n.id));
            }
        }

        function drawTrail(crumbs) {
            const trail = document.getElementById('trail');
            trail.querySelectorAll('button').forEach(b => b.remove());
            for (const c of crumbs) {
                const b = document.createElement('button');
                b.textContent = c.label;
                b.title = c.focal_id;
                b.addEventListener('click', () => restore(c.index));
                trail.insertBefore(b, document.getElementById('error'));
            }
        }

        async function refresh() {
            const [view, crumbs] = await Promise.all([
                fetch('/api/view').then(r => r.json()),
                fetch('/api/breadcrumbs').then(r => r.json()),
            ]);
            draw(view);
            drawTrail(crumbs);
        }

        async function post(url) {
            const response = await fetch(url, { method: 'POST' });
            const body = await response.json();
            document.getElementById('error').textContent = response.ok ? '' : body.error;
            return body;
        }

        async function select(id) {
            svg.classList.add('leaving');
            await post('/api/select/' + encodeURIComponent(id));
            svg.classList.remove('leaving');
            await refresh();
        }

        async function restore(index) {
            await post('/api/breadcrumbs/' + index);
            await refresh();
        }

        refresh();
    </script>
</body>
</html>
"#;
