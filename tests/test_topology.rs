use circuit_sim::api::network_dto::{LinkDto, NetworkDto};
use circuit_sim::domain::network::link::Link;
use circuit_sim::domain::network::link_store::LinkStore;
use circuit_sim::domain::network::route::Route;
use circuit_sim::domain::network::topology::NetworkTopology;
use circuit_sim::domain::utils::id::{EndpointId, EndpointPair};
use circuit_sim::error::Error;

fn waypoints(points: &[&str]) -> Vec<EndpointId> {
    points.iter().map(|p| EndpointId::new(*p)).collect()
}

fn create_network_test_dto() -> NetworkDto {
    NetworkDto {
        links: vec![
            LinkDto { points: vec!["A".to_string(), "B".to_string()], capacity: 10.0 },
            LinkDto { points: vec!["C".to_string(), "B".to_string()], capacity: 5.0 },
            LinkDto { points: vec!["C".to_string(), "D".to_string()], capacity: 8.0 },
        ],
        possible_circuits: vec![
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec!["D".to_string(), "C".to_string(), "B".to_string()],
            vec!["A".to_string(), "B".to_string()],
        ],
        simulation: None,
    }
}

#[test]
fn test_topology_from_dto() {
    let dto = create_network_test_dto();

    let topology = NetworkTopology::try_from(&dto).unwrap();

    assert_eq!(topology.links().len(), 3);
    assert_eq!(topology.routes().len(), 3);

    let route_key = topology.lookup_route(&EndpointPair::new("C", "A")).unwrap();
    let route = topology.route(route_key).unwrap();
    assert_eq!(route.to_string(), "A->B->C");
    assert_eq!(route.links().len(), 2);

    // Routes keep the order they were supplied in.
    let paths: Vec<String> = topology.routes().iter().map(|(_, route)| route.to_string()).collect();
    assert_eq!(paths, vec!["A->B->C", "D->C->B", "A->B"]);
}

#[test]
fn test_route_with_missing_link_fails_construction() {
    let mut dto = create_network_test_dto();
    dto.possible_circuits.push(vec!["A".to_string(), "D".to_string()]);

    let result = NetworkTopology::try_from(&dto);

    assert!(matches!(result, Err(Error::UnknownLink(pair)) if pair == EndpointPair::new("A", "D")));
}

#[test]
fn test_duplicate_link_fails_construction() {
    let mut dto = create_network_test_dto();
    dto.links.push(LinkDto { points: vec!["B".to_string(), "A".to_string()], capacity: 1.0 });

    let result = NetworkTopology::try_from(&dto);

    assert!(matches!(result, Err(Error::DuplicateLink(pair)) if pair == EndpointPair::new("A", "B")));
}

#[test]
fn test_duplicate_route_identity_fails_construction() {
    let mut dto = create_network_test_dto();
    // Same {first, last} as A->B->C, reversed.
    dto.possible_circuits.push(vec!["C".to_string(), "B".to_string(), "A".to_string()]);

    let result = NetworkTopology::try_from(&dto);

    assert!(matches!(result, Err(Error::DuplicateRoute(pair)) if pair == EndpointPair::new("A", "C")));
}

#[test]
fn test_link_with_wrong_number_of_points_fails() {
    let mut dto = create_network_test_dto();
    dto.links.push(LinkDto { points: vec!["A".to_string()], capacity: 1.0 });

    assert!(matches!(NetworkTopology::try_from(&dto), Err(Error::InvalidInput(_))));
}

#[test]
fn test_negative_capacity_fails() {
    let mut dto = create_network_test_dto();
    dto.links[0].capacity = -3.0;

    assert!(matches!(NetworkTopology::try_from(&dto), Err(Error::InvalidCapacity { capacity, .. }) if capacity == -3.0));
}

#[test]
fn test_unknown_route_lookup() {
    let topology = NetworkTopology::try_from(&create_network_test_dto()).unwrap();

    let result = topology.lookup_route(&EndpointPair::new("A", "D"));

    assert!(matches!(result, Err(Error::UnknownRoute(_))));
}

// Link L(A,B,cap=10); Route R=[A,B]. R.demand(10) -> true, then R.demand(1) -> false.
#[test]
fn test_single_link_fills_up() {
    let mut links = LinkStore::new();
    let key = links.insert(Link::new("A", "B", 10.0).unwrap()).unwrap();
    let route = Route::build(&links, waypoints(&["A", "B"])).unwrap();

    assert!(route.demand(&mut links, 10.0));
    assert_eq!(links.get(key).unwrap().used(), 10.0);

    assert!(!route.demand(&mut links, 1.0));
    assert_eq!(links.get(key).unwrap().used(), 10.0);
}

#[test]
fn test_demand_is_atomic_across_shared_links() {
    let mut topology = NetworkTopology::try_from(&create_network_test_dto()).unwrap();
    let abc = topology.lookup_route(&EndpointPair::new("A", "C")).unwrap();
    let dcb = topology.lookup_route(&EndpointPair::new("D", "B")).unwrap();

    // D->C->B takes 4 of the 5 on B-C.
    assert!(topology.demand(dcb, 4.0).unwrap());

    let before: Vec<f64> = topology.links().iter().map(|(_, link)| link.used()).collect();

    // A-B could take 2, B-C cannot.
    assert!(!topology.demand(abc, 2.0).unwrap());

    let after: Vec<f64> = topology.links().iter().map(|(_, link)| link.used()).collect();
    assert_eq!(before, after, "A rejected demand must leave every link unchanged");

    assert!(topology.demand(abc, 1.0).unwrap());
    let ab = topology.links().get_by_endpoints(&EndpointPair::new("A", "B")).unwrap();
    let bc = topology.links().get_by_endpoints(&EndpointPair::new("B", "C")).unwrap();
    assert_eq!(ab.used(), 1.0);
    assert_eq!(bc.used(), 5.0);
    assert!(topology.capacity_invariant_holds());
}

#[test]
fn test_allocate_then_release_restores_every_link() {
    let mut topology = NetworkTopology::try_from(&create_network_test_dto()).unwrap();
    let abc = topology.lookup_route(&EndpointPair::new("A", "C")).unwrap();
    let ab = topology.lookup_route(&EndpointPair::new("A", "B")).unwrap();

    assert!(topology.demand(ab, 2.0).unwrap());
    let before: Vec<f64> = topology.links().iter().map(|(_, link)| link.used()).collect();

    assert!(topology.demand(abc, 3.5).unwrap());
    topology.release(abc, 3.5).unwrap();

    let after: Vec<f64> = topology.links().iter().map(|(_, link)| link.used()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_release_without_allocation_is_an_error() {
    let mut topology = NetworkTopology::try_from(&create_network_test_dto()).unwrap();
    let abc = topology.lookup_route(&EndpointPair::new("A", "C")).unwrap();

    let result = topology.release(abc, 1.0);

    assert!(matches!(result, Err(Error::CapacityUnderflow { .. })));
    assert!(topology.links().iter().all(|(_, link)| link.used() == 0.0));
}

#[test]
fn test_demand_rejects_invalid_amount() {
    let mut topology = NetworkTopology::try_from(&create_network_test_dto()).unwrap();
    let ab = topology.lookup_route(&EndpointPair::new("A", "B")).unwrap();

    assert!(matches!(topology.demand(ab, -1.0), Err(Error::InvalidAmount { .. })));
    assert!(matches!(topology.demand(ab, f64::NAN), Err(Error::InvalidAmount { .. })));
    assert_eq!(topology.links().total_used(), 0.0);
}
