// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::queue::Frontier;
use super::{PathTree, SearchStrategy};
use crate::{EdgeId, Error, Graph, VertexId};

/// When a route search may stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// Stop as soon as any path to the destination is known, that is right after
    /// the visit which first relaxes the destination.
    ///
    /// The returned route is the shortest one only if no cheaper path is discovered
    /// later - e.g. a long direct edge is preferred over a shorter detour
    /// through a vertex not yet visited.
    #[default]
    Reached,

    /// Stop after visiting the destination, which guarantees
    /// that the returned route is the shortest one.
    Settled,
}

/// Additional controls of a [RoutingService].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// How the next vertex to visit is selected. Both strategies visit vertices
    /// in the same order and thus return the same routes.
    pub strategy: SearchStrategy,

    pub termination: Termination,

    /// Maximum number of vertices visited by a single search before
    /// [Error::StepLimitExceeded] is returned. Concluding that no route exists
    /// requires visiting every vertex reachable from the origin.
    pub step_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            termination: Termination::default(),
            step_limit: usize::MAX,
        }
    }
}

/// Finds routes over a [Graph] using
/// [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm).
///
/// The service only borrows the graph - all search state lives in a [PathTree]
/// owned by a single call, so one service may be shared between threads.
#[derive(Debug, Clone, Copy)]
pub struct RoutingService<'g> {
    graph: &'g Graph,
    options: Options,
}

impl<'g> RoutingService<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_options(graph, Options::default())
    }

    pub fn with_options(graph: &'g Graph, options: Options) -> Self {
        Self { graph, options }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Finds a route between two vertices, returned as a sequence of edges
    /// from `origin` to `destination`. The route from a vertex to itself is empty.
    ///
    /// Edge lengths must not be negative; this is not checked.
    pub fn find_route(
        &self,
        origin: VertexId,
        destination: VertexId,
    ) -> Result<Vec<EdgeId>, Error> {
        let tree = self.find_path_tree(origin, destination)?;
        Ok(tree.path(destination))
    }

    /// Finds a route between two vertices identified by [Vertex::id](crate::Vertex::id).
    pub fn find_route_by_ids(&self, origin: &str, destination: &str) -> Result<Vec<EdgeId>, Error> {
        let origin = self.graph.find_vertex_by_id(origin)?;
        let destination = self.graph.find_vertex_by_id(destination)?;
        self.find_route(origin, destination)
    }

    /// Runs the search from `origin` until `destination` is found,
    /// and returns the resulting [PathTree]. No vertices are visited
    /// if `origin` and `destination` are the same.
    pub fn find_path_tree(
        &self,
        origin: VertexId,
        destination: VertexId,
    ) -> Result<PathTree<'g>, Error> {
        let mut tree = PathTree::new(self.graph, origin);
        if origin == destination {
            return Ok(tree);
        }

        let mut frontier = Frontier::new(self.options.strategy, &tree);
        let mut steps: usize = 0;

        while let Some(vertex) = frontier.next(&tree) {
            steps += 1;
            if steps > self.options.step_limit {
                return Err(Error::StepLimitExceeded(self.options.step_limit));
            }

            self.visit(&mut tree, &mut frontier, vertex);

            if self.is_found(&tree, destination) {
                log::debug!(
                    "route from {} to {} found after {} visits, cost {:.3} km",
                    self.graph.vertex(origin).id,
                    self.graph.vertex(destination).id,
                    steps,
                    tree.cost(destination),
                );
                return Ok(tree);
            }
        }

        log::debug!(
            "no route from {} to {}, {} vertices visited",
            self.graph.vertex(origin).id,
            self.graph.vertex(destination).id,
            steps,
        );
        Err(Error::RouteNotFound {
            origin: self.graph.vertex(origin).id.clone(),
            destination: self.graph.vertex(destination).id.clone(),
        })
    }

    /// Relaxes all out edges of a `vertex` and marks it as visited.
    ///
    /// A target is only updated on a strictly lower cost - on ties,
    /// the first relaxation is kept.
    fn visit(&self, tree: &mut PathTree<'g>, frontier: &mut Frontier, vertex: VertexId) {
        let cost = tree.cost(vertex);
        log::trace!("visiting {} at {:.3} km", self.graph.vertex(vertex).id, cost);

        for edge in self.graph.out_edges(vertex) {
            let target = self.graph.edge(edge).target();
            let new_cost = cost + self.graph.edge_length(edge);

            let node = tree.get_or_create_node(target);
            if new_cost < node.cost {
                node.cost = new_cost;
                node.reaching_edge = Some(edge);
                frontier.push(target, new_cost);
            }
        }

        tree.get_or_create_node(vertex).visited = true;
    }

    fn is_found(&self, tree: &PathTree<'_>, destination: VertexId) -> bool {
        match self.options.termination {
            Termination::Reached => tree.is_reached(destination),
            Termination::Settled => tree.node(destination).is_some_and(|node| node.visited),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, VertexKey};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    const STRATEGIES: [SearchStrategy; 2] = [SearchStrategy::LinearScan, SearchStrategy::BinaryHeap];

    fn options(strategy: SearchStrategy, termination: Termination) -> Options {
        Options {
            strategy,
            termination,
            ..Options::default()
        }
    }

    /// A(0,0), B(1,0), C(1,1), D(0,1) with A→B, B→C, A→C and C→D.
    fn square() -> (Graph, [VertexId; 4], [EdgeId; 4]) {
        let mut g = Graph::new();
        let a = g.create_vertex(Coordinate::new(0.0, 0.0), "A");
        let b = g.create_vertex(Coordinate::new(1.0, 0.0), "B");
        let c = g.create_vertex(Coordinate::new(1.0, 1.0), "C");
        let d = g.create_vertex(Coordinate::new(0.0, 1.0), "D");
        let ab = g.create_edge(a, b, "AB");
        let bc = g.create_edge(b, c, "BC");
        let ac = g.create_edge(a, c, "AC");
        let cd = g.create_edge(c, d, "CD");
        (g, [a, b, c, d], [ab, bc, ac, cd])
    }

    /// A `size`×`size` grid with 0.01° spacing. Horizontal edges go both ways,
    /// vertical edges only go north, and every cell has a one-way diagonal
    /// going north-east.
    fn grid(size: usize) -> (Graph, Vec<VertexId>) {
        let mut g = Graph::new();
        let mut vertices = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                vertices.push(g.create_vertex(
                    Coordinate::new(x as f64 * 0.01, y as f64 * 0.01),
                    format!("{},{}", x, y),
                ));
            }
        }

        let at = |x: usize, y: usize| vertices[y * size + x];
        for y in 0..size {
            for x in 0..size {
                if x + 1 < size {
                    g.create_edge(at(x, y), at(x + 1, y), format!("{},{}>E", x, y));
                    g.create_edge(at(x + 1, y), at(x, y), format!("{},{}>W", x + 1, y));
                }
                if y + 1 < size {
                    g.create_edge(at(x, y), at(x, y + 1), format!("{},{}>N", x, y));
                }
                if x + 1 < size && y + 1 < size {
                    g.create_edge(at(x, y), at(x + 1, y + 1), format!("{},{}>NE", x, y));
                }
            }
        }

        (g, vertices)
    }

    /// Reference shortest path costs computed with the Bellman-Ford algorithm.
    fn bellman_ford(g: &Graph, origin: VertexId) -> Vec<f64> {
        let mut costs = vec![f64::INFINITY; g.vertex_count()];
        costs[origin.index()] = 0.0;
        for _ in 0..g.vertex_count() {
            for (id, edge) in g.edges() {
                let new_cost = costs[edge.source().index()] + g.edge_length(id);
                if new_cost < costs[edge.target().index()] {
                    costs[edge.target().index()] = new_cost;
                }
            }
        }
        costs
    }

    fn assert_continuous(g: &Graph, route: &[EdgeId], origin: VertexId, destination: VertexId) {
        assert!(!route.is_empty());
        assert_eq!(g.edge(route[0]).source(), origin);
        assert_eq!(g.edge(route[route.len() - 1]).target(), destination);
        for pair in route.windows(2) {
            assert_eq!(g.edge(pair[0]).target(), g.edge(pair[1]).source());
        }
    }

    #[test]
    fn diagonal_shortcut() {
        let (g, [a, _, _, d], [_, _, ac, cd]) = square();
        for strategy in STRATEGIES {
            let service = RoutingService::with_options(&g, options(strategy, Termination::Reached));
            let route = service.find_route(a, d).unwrap();
            assert_eq!(route, vec![ac, cd]);
            assert_almost_eq!(g.path_length(&route), g.edge_length(ac) + g.edge_length(cd));
        }
    }

    #[test]
    fn route_cost_matches_path_tree() {
        let (g, [a, _, _, d], _) = square();
        let tree = RoutingService::new(&g).find_path_tree(a, d).unwrap();
        assert_almost_eq!(g.path_length(&tree.path(d)), tree.cost(d));
        assert_eq!(tree.origin(), a);
    }

    #[test]
    fn route_to_origin_is_empty() {
        let (g, [a, _, _, d], _) = square();
        let service = RoutingService::new(&g);
        assert_eq!(service.find_route(a, a), Ok(vec![]));
        // D has no out edges - the origin is still trivially reached
        assert_eq!(service.find_route(d, d), Ok(vec![]));
    }

    #[test]
    fn route_not_found() {
        let (mut g, [a, _, c, d], _) = square();
        let island = g.create_vertex(Coordinate::new(5.0, 5.0), "E");

        for strategy in STRATEGIES {
            for termination in [Termination::Reached, Termination::Settled] {
                let service = RoutingService::with_options(&g, options(strategy, termination));
                assert_eq!(
                    service.find_route(a, island),
                    Err(Error::RouteNotFound {
                        origin: "A".to_string(),
                        destination: "E".to_string(),
                    }),
                );

                // Edges are directed - there is no way back from D
                assert_eq!(
                    service.find_route(d, c),
                    Err(Error::RouteNotFound {
                        origin: "D".to_string(),
                        destination: "C".to_string(),
                    }),
                );
            }
        }
    }

    #[test]
    fn directed_asymmetry() {
        let mut g = Graph::new();
        let a = g.create_vertex(Coordinate::new(0.0, 0.0), "A");
        let b = g.create_vertex(Coordinate::new(0.1, 0.0), "B");
        let ab = g.create_edge(a, b, "AB");
        let ba = g.create_edge(b, a, "BA");
        g.set_edge_geometry(
            ba,
            vec![
                Coordinate::new(0.1, 0.0),
                Coordinate::new(0.05, 0.2),
                Coordinate::new(0.0, 0.0),
            ],
        );

        let service = RoutingService::new(&g);
        let there = service.find_path_tree(a, b).unwrap();
        let back = service.find_path_tree(b, a).unwrap();

        assert_eq!(there.path(b), vec![ab]);
        assert_eq!(back.path(a), vec![ba]);
        assert!(back.cost(a) > there.cost(b));
    }

    #[test]
    fn equal_costs_keep_first_relaxation() {
        // B and C are mirror images - both A→B→D and A→C→D have the same cost
        let mut g = Graph::new();
        let a = g.create_vertex(Coordinate::new(0.0, 0.0), "A");
        let b = g.create_vertex(Coordinate::new(0.5, 0.5), "B");
        let c = g.create_vertex(Coordinate::new(0.5, -0.5), "C");
        let d = g.create_vertex(Coordinate::new(1.0, 0.0), "D");
        let ab = g.create_edge(a, b, "AB");
        g.create_edge(a, c, "AC");
        g.create_edge(c, d, "CD");
        let bd = g.create_edge(b, d, "BD");

        for strategy in STRATEGIES {
            for termination in [Termination::Reached, Termination::Settled] {
                let service = RoutingService::with_options(&g, options(strategy, termination));
                assert_eq!(service.find_route(a, d), Ok(vec![ab, bd]));
            }
        }
    }

    #[test]
    fn reached_and_settled_termination() {
        // Direct A→D edge bends far north, A→B→D is a straight line
        let mut g = Graph::new();
        let a = g.create_vertex(Coordinate::new(0.0, 0.0), "A");
        let b = g.create_vertex(Coordinate::new(0.5, 0.0), "B");
        let d = g.create_vertex(Coordinate::new(1.0, 0.0), "D");
        let ad = g.create_edge(a, d, "AD");
        g.set_edge_geometry(
            ad,
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.5, 1.0),
                Coordinate::new(1.0, 0.0),
            ],
        );
        let ab = g.create_edge(a, b, "AB");
        let bd = g.create_edge(b, d, "BD");

        for strategy in STRATEGIES {
            let reached = RoutingService::with_options(&g, options(strategy, Termination::Reached));
            assert_eq!(reached.find_route(a, d), Ok(vec![ad]));

            let settled = RoutingService::with_options(&g, options(strategy, Termination::Settled));
            assert_eq!(settled.find_route(a, d), Ok(vec![ab, bd]));
        }
    }

    #[test]
    fn grid_routes() {
        let (g, vertices) = grid(5);
        let origin = vertices[0];
        let expected_costs = bellman_ford(&g, origin);

        for strategy in STRATEGIES {
            let reached = RoutingService::with_options(&g, options(strategy, Termination::Reached));
            let settled = RoutingService::with_options(&g, options(strategy, Termination::Settled));

            for &destination in &vertices[1..] {
                let tree = reached.find_path_tree(origin, destination).unwrap();
                let route = tree.path(destination);
                assert_continuous(&g, &route, origin, destination);
                assert_almost_eq!(g.path_length(&route), tree.cost(destination));

                let tree = settled.find_path_tree(origin, destination).unwrap();
                let route = tree.path(destination);
                assert_continuous(&g, &route, origin, destination);
                assert_almost_eq!(g.path_length(&route), tree.cost(destination));
                assert_almost_eq!(tree.cost(destination), expected_costs[destination.index()]);
            }
        }
    }

    #[test]
    fn strategies_return_identical_routes() {
        let (g, vertices) = grid(6);
        let linear = RoutingService::with_options(
            &g,
            options(SearchStrategy::LinearScan, Termination::Settled),
        );
        let heap = RoutingService::with_options(
            &g,
            options(SearchStrategy::BinaryHeap, Termination::Settled),
        );

        for &origin in &vertices {
            for &destination in &vertices {
                assert_eq!(
                    linear.find_route(origin, destination),
                    heap.find_route(origin, destination),
                );
            }
        }
    }

    #[test]
    fn step_limit() {
        let (g, vertices) = grid(4);
        let service = RoutingService::with_options(
            &g,
            Options {
                step_limit: 2,
                ..Options::default()
            },
        );

        assert_eq!(
            service.find_route(vertices[0], vertices[15]),
            Err(Error::StepLimitExceeded(2)),
        );
        // Neighbors are reached by the first visit
        assert!(service.find_route(vertices[0], vertices[1]).is_ok());
    }

    #[test]
    fn zero_step_limit() {
        let (g, vertices) = grid(3);

        for termination in [Termination::Reached, Termination::Settled] {
            let service = RoutingService::with_options(
                &g,
                Options {
                    termination,
                    step_limit: 0,
                    ..Options::default()
                },
            );

            assert_eq!(service.find_route(vertices[4], vertices[4]), Ok(vec![]));
            assert_eq!(
                service.find_route(vertices[4], vertices[5]),
                Err(Error::StepLimitExceeded(0)),
            );
        }
    }

    #[test]
    fn find_route_by_ids() {
        let (g, _, [_, _, ac, cd]) = square();
        let service = RoutingService::new(&g);

        assert_eq!(service.find_route_by_ids("A", "D"), Ok(vec![ac, cd]));
        assert_eq!(
            service.find_route_by_ids("A", "X"),
            Err(Error::VertexNotFound(VertexKey::Id("X".to_string()))),
        );
    }

    #[test]
    fn concurrent_queries() {
        let (g, vertices) = grid(5);
        let service = RoutingService::new(&g);
        let expected: Vec<_> = vertices
            .iter()
            .map(|&destination| service.find_route(vertices[0], destination))
            .collect();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        vertices
                            .iter()
                            .map(|&destination| service.find_route(vertices[0], destination))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
